//! Local validation, run before any request is sent.
//!
//! Bounds and messages match the server so a payload that passes here is
//! only rejected remotely if the server changed its rules.

use crate::error::FieldErrors;
use crate::types::{NewTask, TaskStatus, UpdateTask};

pub const MIN_TITLE_LEN: usize = 2;
pub const MAX_TITLE_LEN: usize = 100;
pub const MIN_DESCRIPTION_LEN: usize = 3;
pub const MAX_DESCRIPTION_LEN: usize = 500;

fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    let message = if value.trim().is_empty() {
        format!("{} is required", label)
    } else if len < min {
        format!("{} must be at least {} characters long", label, min)
    } else if len > max {
        format!("{} must be at most {} characters long", label, max)
    } else {
        return;
    };
    errors.insert(field.to_string(), message);
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn validate_new_task(task: &NewTask) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "title", "Title", &task.title, MIN_TITLE_LEN, MAX_TITLE_LEN);
    check_text(
        &mut errors,
        "description",
        "Description",
        &task.description,
        MIN_DESCRIPTION_LEN,
        MAX_DESCRIPTION_LEN,
    );
    finish(errors)
}

pub fn validate_update(update: &UpdateTask) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Some(title) = &update.title {
        check_text(&mut errors, "title", "Title", title, MIN_TITLE_LEN, MAX_TITLE_LEN);
    }
    if let Some(description) = &update.description {
        check_text(
            &mut errors,
            "description",
            "Description",
            description,
            MIN_DESCRIPTION_LEN,
            MAX_DESCRIPTION_LEN,
        );
    }
    finish(errors)
}

/// Parse a status picked from a form field.
pub fn parse_status(raw: &str) -> Result<TaskStatus, FieldErrors> {
    raw.parse().map_err(|_| {
        let allowed = TaskStatus::ALL.map(|s| s.as_str()).join(", ");
        FieldErrors::from([(
            "status".to_string(),
            format!("Status must be one of {}", allowed),
        )])
    })
}
