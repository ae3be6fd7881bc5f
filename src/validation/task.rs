use crate::dtos::{NewTaskDto, UpdateTaskDto};
use crate::models::{TaskChanges, TaskStatus};

use super::constants::*;
use super::{ValidationError, ValidationResult};

/// Check a required text field against its length bounds, recording at most
/// one error (the first rule it breaks).
fn check_text(
    errors: &mut Vec<ValidationError>,
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
    errors.push(ValidationError::new(field, message));
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates title and description of a task about to be created.
pub fn validate_task_fields(title: &str, description: &str) -> ValidationResult {
    let mut errors = Vec::new();
    check_text(&mut errors, "title", "Title", title, MIN_TITLE_LEN, MAX_TITLE_LEN);
    check_text(
        &mut errors,
        "description",
        "Description",
        description,
        MIN_DESCRIPTION_LEN,
        MAX_DESCRIPTION_LEN,
    );
    into_result(errors)
}

/// Validates a create-task payload.
pub fn validate_new_task(dto: &NewTaskDto) -> ValidationResult {
    validate_task_fields(&dto.title, &dto.description)
}

/// Validates the provided fields of a change set. Omitted fields are not checked.
pub fn validate_changes(changes: &TaskChanges) -> ValidationResult {
    let mut errors = Vec::new();
    if let Some(ref title) = changes.title {
        check_text(&mut errors, "title", "Title", title, MIN_TITLE_LEN, MAX_TITLE_LEN);
    }
    if let Some(ref description) = changes.description {
        check_text(
            &mut errors,
            "description",
            "Description",
            description,
            MIN_DESCRIPTION_LEN,
            MAX_DESCRIPTION_LEN,
        );
    }
    into_result(errors)
}

/// Validates an update payload and turns it into a change set.
///
/// `status` arrives as free text so an unknown value is reported as a field
/// error rather than a body parse failure.
pub fn validate_update_task(dto: &UpdateTaskDto) -> Result<TaskChanges, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let status = match dto.status.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<TaskStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.push(ValidationError::new(
                    "status",
                    "Status must be one of Pending, Running, Completed, Failed",
                ));
                None
            }
        },
    };

    let changes = TaskChanges {
        title: dto.title.clone(),
        description: dto.description.clone(),
        status,
    };

    if let Err(field_errors) = validate_changes(&changes) {
        errors.extend(field_errors);
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}
