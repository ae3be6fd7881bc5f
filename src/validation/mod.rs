//! Input validation for task creation and updates.
//!
//! These checks are authoritative: the handlers run them before touching the
//! store, and the store runs them again for callers that bypass HTTP.

mod constants;
mod task;

pub use constants::*;
pub use task::{
    validate_changes, validate_new_task, validate_task_fields, validate_update_task,
};

/// Validation error with details about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of validation - either Ok or a list of errors.
pub type ValidationResult = Result<(), Vec<ValidationError>>;
