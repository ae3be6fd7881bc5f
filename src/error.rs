//! Error types for the taskboard service.
//!
//! `TaskError` is what the store and validation layers return; `ApiError`
//! is what handlers return and knows how to render itself as an envelope.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::dtos::Envelope;
use crate::models::TaskStatus;
use crate::validation::ValidationError;

/// Main error type for store operations.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// Task not found
    #[error("Task not found: {0}")]
    TaskNotFound(uuid::Uuid),

    /// Input rejected by validation
    #[error("Validation error: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// Status change refused by the transition policy
    #[error("Cannot move task from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    /// Internal error (unexpected)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error type for API operations (converts to HTTP responses).
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Option<BTreeMap<String, String>>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            errors: None,
        }
    }

    /// Build a 400 from validation failures, keeping the first message per field.
    pub fn validation(errors: &[ValidationError]) -> Self {
        let mut by_field = BTreeMap::new();
        for e in errors {
            by_field
                .entry(e.field.clone())
                .or_insert_with(|| e.message.clone());
        }
        ApiError::BadRequest {
            message: format!("Validation failed: {}", join_errors(errors)),
            errors: Some(by_field),
        }
    }

    /// Map a store error, replacing internal failures with `failure_message`.
    ///
    /// Internal detail goes to the log, never to the client.
    pub fn from_store(err: TaskError, operation: &str, failure_message: &str) -> Self {
        match err {
            TaskError::TaskNotFound(_) => ApiError::NotFound("Task not found".to_string()),
            TaskError::Validation(errors) => ApiError::validation(&errors),
            TaskError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            TaskError::Database(_) | TaskError::Pool(_) | TaskError::Internal(_) => {
                log::error!("{} failed: {}", operation, err);
                crate::metrics::record_store_error(operation);
                ApiError::InternalServerError(failure_message.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut envelope = Envelope::<()>::failure(self.to_string());
        if let ApiError::BadRequest { errors, .. } = self {
            envelope.errors = errors.clone();
        }
        HttpResponse::build(self.status_code()).json(envelope)
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        ApiError::from_store(err, "store operation", "Internal server error")
    }
}

/// Result type alias for store operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
