//! Authentication and operational route tests

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test, web, App};
use chrono::Duration;
use common::{memory_repo, TestUser};
use crypto_core::{jwt, test_keys};
use diary_service::handlers::{self, HealthState};
use serde_json::Value;
use uuid::Uuid;

async fn assert_unauthenticated(header: Option<(&'static str, String)>) {
    let repo = memory_repo();
    let app = diary_app!(repo);

    let mut req = test::TestRequest::get().uri("/diaries/post/list/");
    if let Some(header) = header {
        req = req.insert_header(header);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHENTICATED");
}

#[actix_web::test]
async fn test_missing_authorization_header() {
    test_keys::install_test_keys();
    assert_unauthenticated(None).await;
}

#[actix_web::test]
async fn test_non_bearer_scheme_is_rejected() {
    let user = TestUser::new("basic");
    assert_unauthenticated(Some(("Authorization", format!("Basic {}", user.token)))).await;
}

#[actix_web::test]
async fn test_garbage_token_is_rejected() {
    test_keys::install_test_keys();
    assert_unauthenticated(Some(("Authorization", "Bearer not.a.jwt".to_string()))).await;
}

#[actix_web::test]
async fn test_refresh_token_is_not_an_access_token() {
    test_keys::install_test_keys();
    let token = jwt::generate_token(Uuid::new_v4(), "r", "refresh", Duration::hours(1))
        .expect("mint refresh token");
    assert_unauthenticated(Some(("Authorization", format!("Bearer {token}")))).await;
}

#[actix_web::test]
async fn test_expired_token_is_rejected() {
    test_keys::install_test_keys();
    let token = jwt::generate_token(Uuid::new_v4(), "late", "access", Duration::hours(-2))
        .expect("mint expired token");
    assert_unauthenticated(Some(("Authorization", format!("Bearer {token}")))).await;
}

#[actix_web::test]
async fn test_valid_token_provisions_user() {
    let repo = memory_repo();
    let app = diary_app!(repo);
    let user = TestUser::new("newcomer");

    let req = test::TestRequest::get()
        .uri("/diaries/post/list/")
        .insert_header(user.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = repo.find_user(user.id).await.unwrap().expect("user provisioned");
    assert_eq!(stored.username, "newcomer");
    assert_eq!(stored.subscribers, 0);
}

#[actix_web::test]
async fn test_operational_routes_skip_authentication() {
    let repo = memory_repo();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(HealthState::new(repo.clone(), "memory")))
            .configure(handlers::configure_operational),
    )
    .await;

    for uri in ["/api/v1/health", "/api/v1/health/ready", "/api/v1/health/live"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["storage"], "memory");

    let req = test::TestRequest::get().uri("/metrics").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
