//! HTTP handlers for taskboard endpoints.
//!
//! This module contains all HTTP handler functions that can be used by both
//! the main application and integration tests.

mod health;
pub mod response;
mod task;

use std::sync::Arc;

use actix_web::web;
use utoipa::OpenApi;

use crate::{config::Config, dtos, models, store::StoreHandle};

// Re-export handlers for route configuration
pub use health::{health_check, metrics_endpoint, openapi_json};
pub use task::{create_task, delete_task, get_all_task, show_task, update_task};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub config: Arc<Config>,
}

/// Health check response showing service and store status.
#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Overall service status: "ok" or "degraded"
    pub status: String,
    /// Store connectivity status: "healthy" or "unhealthy"
    pub store: String,
    /// Which store backend is serving requests
    pub backend: String,
    /// Active status transition policy: "free" or "lifecycle"
    pub transitions: String,
}

// =============================================================================
// OpenAPI Documentation
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        task::create_task,
        task::get_all_task,
        task::show_task,
        task::update_task,
        task::delete_task,
    ),
    components(schemas(
        HealthResponse,
        dtos::NewTaskDto,
        dtos::UpdateTaskDto,
        models::Task,
        models::TaskStatus,
    )),
    tags(
        (name = "health", description = "Liveness check. GET /health pings the task store."),
        (name = "tasks", description = "Task CRUD. Every response is an envelope `{status, message, taskData?}`."),
    ),
    info(
        title = "Taskboard API",
        version = "0.1.0",
        description = "Create, list, view, update and delete tasks.",
    )
)]
pub struct ApiDoc;

// =============================================================================
// Route Configuration
// =============================================================================

/// Configure all routes for the application.
/// This can be used by both the main application and integration tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(response::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(response::path_error_handler))
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
        .service(
            web::scope("/task")
                .route("/create-task", web::post().to(create_task))
                .route("/get-all-task", web::get().to(get_all_task))
                .route("/show-task/{task_id}", web::get().to(show_task))
                .route("/update-task/{task_id}", web::put().to(update_task))
                .route("/delete-task/{task_id}", web::delete().to(delete_task)),
        );
}
