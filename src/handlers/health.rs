use actix_web::{HttpResponse, web};
use utoipa::OpenApi;

use super::{ApiDoc, AppState, HealthResponse};
use crate::metrics;

#[utoipa::path(
    get,
    path = "/health",
    summary = "Health check",
    description = "Pings the task store. Returns 200 if it answers, 503 otherwise.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded: store unreachable", body = HealthResponse),
    ),
    tag = "health"
)]
/// Health check endpoint - verifies store connectivity
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_status = match state.store.ping().await {
        Ok(()) => "healthy".to_string(),
        Err(e) => {
            log::warn!("Health check: store ping failed: {}", e);
            "unhealthy".to_string()
        }
    };

    let is_healthy = store_status == "healthy";

    let response = HealthResponse {
        status: if is_healthy {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        store: store_status,
        backend: state.store.backend().to_string(),
        transitions: state.config.transition_policy.as_str().to_string(),
    };

    if is_healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Prometheus text exposition of the service counters
pub async fn metrics_endpoint() -> HttpResponse {
    match metrics::gather_text() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// OpenAPI document for the service
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
