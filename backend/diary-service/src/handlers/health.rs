//! Liveness, readiness and summary health endpoints.

use crate::db::DiaryRepository;
use crate::error::AppError;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub struct HealthState {
    repo: Arc<dyn DiaryRepository>,
    backend: &'static str,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    pub fn new(repo: Arc<dyn DiaryRepository>, backend: &'static str) -> Self {
        Self { repo, backend }
    }
}

/// Storage errors go to the log; probes only learn which component failed
fn failure_message(backend: &str, err: &AppError) -> String {
    tracing::warn!(backend, error = %err, "health check failed");
    format!("{backend} check failed")
}

pub async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.repo.health_check().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "diary-service",
            "storage": state.backend,
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": failure_message(state.backend, &e),
            "service": "diary-service"
        })),
    }
}

pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.repo.health_check().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    let (ready, check) = match result {
        Ok(_) => (
            true,
            ComponentCheck {
                status: ComponentStatus::Healthy,
                message: format!("{} reachable", state.backend),
                latency_ms,
            },
        ),
        Err(e) => (
            false,
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: failure_message(state.backend, &e),
                latency_ms,
            },
        ),
    };

    let mut checks = HashMap::new();
    checks.insert(state.backend.to_string(), check);

    let response = ReadinessResponse {
        ready,
        status: if ready {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        },
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
