use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted task record.
///
/// Serialized with camelCase keys: `{id, title, description, status, createdAt, updatedAt}`.
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::task)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier. Never reused, even after deletion.
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

/// Row written on create. The store fills in identity and timestamps.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::task)]
pub struct NewTask {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl NewTask {
    pub fn new(title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            title,
            description,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<NewTask> for Task {
    fn from(t: NewTask) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            status: t.status,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Mutable fields of a task. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    /// Apply the changes to an in-memory record, touching `updated_at`.
    pub fn apply_to(self, task: &mut Task, now: chrono::DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = now;
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::task)]
pub(crate) struct TaskChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl TaskChangeset {
    pub(crate) fn new(changes: TaskChanges, now: chrono::DateTime<Utc>) -> Self {
        Self {
            title: changes.title,
            description: changes.description,
            status: changes.status,
            updated_at: now,
        }
    }
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    diesel_derive_enum::DbEnum,
    ToSchema,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::TaskStatus")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::Running,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Running => "Running",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown task status '{}'", s))
    }
}
