/// HTTP middleware utilities for diary-service
///
/// Provides bearer-token authentication, the acting-user extractor and
/// request metrics.
pub mod permissions;

pub use permissions::*;

use crate::db::DiaryRepository;
use crate::error::AppError;
use crate::metrics::observe_http_request;
use crate::models::User;
use crate::services::{BootstrapAdmins, UserService};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use crypto_core::jwt;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

// =====================================================================
// JWT Authentication
// =====================================================================

/// Identity taken from a validated access token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Actix middleware that validates a Bearer token using shared JWT helpers.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let auth_user = authenticate(&req)?;
            req.extensions_mut().insert(auth_user);
            service.call(req).await
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthUser, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthenticated("Invalid Authorization scheme".into()))?;

    let claims = jwt::validate_access_token(token.trim()).map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        AppError::Unauthenticated("Invalid or expired token".into())
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthenticated("Invalid user ID".into()))?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
    })
}

// =====================================================================
// Acting user
// =====================================================================

/// The diary user behind the current request, provisioned on first sight.
#[derive(Debug, Clone)]
pub struct Actor(pub User);

impl FromRequest for Actor {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth_user = req.extensions().get::<AuthUser>().cloned();
        let repo = req
            .app_data::<web::Data<dyn DiaryRepository>>()
            .map(|data| data.clone().into_inner());
        let admins = req
            .app_data::<web::Data<BootstrapAdmins>>()
            .map(|data| data.get_ref().clone())
            .unwrap_or_default();

        Box::pin(async move {
            let auth_user = auth_user
                .ok_or_else(|| AppError::Unauthenticated("User identity missing".into()))?;
            let repo =
                repo.ok_or_else(|| AppError::Internal("repository not configured".into()))?;

            let user = UserService::with_bootstrap_admins(repo, admins)
                .resolve_actor(auth_user.user_id, &auth_user.username)
                .await?;
            Ok(Actor(user))
        })
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();
            let status = match &res {
                Ok(response) => response.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };

            observe_http_request(&method, status, elapsed.as_secs_f64());
            tracing::debug!(
                %method,
                %path,
                status,
                elapsed_ms = elapsed.as_millis() as u64,
                "request completed"
            );
            res
        })
    }
}
