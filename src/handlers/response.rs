use actix_web::{HttpRequest, error};

use crate::error::ApiError;

/// Turn an unreadable JSON body into a 400 envelope.
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected request body: {}", err);
    ApiError::bad_request(format!("Invalid request body: {}", err)).into()
}

/// A task id that does not parse can never match a task: answer 404.
pub fn path_error_handler(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Unparseable path {}: {}", req.path(), err);
    ApiError::NotFound("Task not found".to_string()).into()
}
