use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::TaskStatus;

/// Input DTO for `POST /task/create-task`.
///
/// Missing fields deserialize as empty strings so they are reported by
/// validation ("Title is required") instead of failing body parsing.
///
/// ## Example
/// ```json
/// {"title": "Buy milk", "description": "2% milk"}
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewTaskDto {
    /// Task title, 2 to 100 characters.
    #[serde(default)]
    pub title: String,
    /// Task description, 3 to 500 characters.
    #[serde(default)]
    pub description: String,
}

/// Payload for `PUT /task/update-task/{task_id}`. Omitted fields keep their stored value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskDto {
    /// New title, 2 to 100 characters.
    pub title: Option<String>,
    /// New description, 3 to 500 characters.
    pub description: Option<String>,
    /// New status. Any status may be set from any other unless the server
    /// runs with the `lifecycle` transition policy.
    #[schema(value_type = Option<TaskStatus>)]
    pub status: Option<String>,
}

/// Uniform response wrapper used by every task endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// `true` on success, `false` on any failure.
    pub status: bool,
    /// Human-readable outcome, suitable for showing to the user as-is.
    pub message: String,
    /// The task (show, create, update) or the ordered task list (list).
    #[serde(rename = "taskData", skip_serializing_if = "Option::is_none")]
    pub task_data: Option<T>,
    /// First failed rule per field, present on validation failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, task_data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            task_data: Some(task_data),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            task_data: None,
            errors: None,
        }
    }
}

impl Envelope<()> {
    /// Success without a payload (delete).
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            task_data: None,
            errors: None,
        }
    }
}
