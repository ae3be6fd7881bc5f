//! # Taskboard SDK
//!
//! Rust client library for the Taskboard API.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use taskboard_sdk::{Client, NewTask, TaskStatus, UpdateTask};
//!
//! #[tokio::main]
//! async fn main() -> taskboard_sdk::Result<()> {
//!     let client = Client::new("http://localhost:3000");
//!
//!     let created = client.create_task(&NewTask::new("Buy milk", "2% milk")).await?;
//!     println!("{}: {}", created.message, created.data.id);
//!
//!     client
//!         .update_task(created.data.id, &UpdateTask::status(TaskStatus::Running))
//!         .await?;
//!
//!     for task in client.list_tasks().await?.data {
//!         println!("{} [{}]", task.title, task.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`TaskBoard`] layers local state on top of [`Client`]: busy tracking per
//! action, transient notifications and reconciliation of server replies.

pub mod board;
mod error;
mod types;
pub mod validation;

pub use board::{Notification, NotificationLevel, PendingAction, TaskBoard};
pub use error::{Error, FieldErrors, Result};
pub use types::*;

use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Client for the Taskboard API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a new client pointing to the given Taskboard base URL.
    ///
    /// ```rust
    /// let client = taskboard_sdk::Client::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a custom `reqwest::Client` (e.g. for custom TLS, timeouts).
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let mut base = base_url.into();
        // Strip trailing slash for consistent URL building
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base_url: base,
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check service health (GET /health).
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::make_api_error(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| Error::Deserialize(e.to_string()))
    }

    // =========================================================================
    // Task CRUD
    // =========================================================================

    /// Create a task (POST /task/create-task).
    ///
    /// The payload is validated locally first; on failure no request is sent.
    pub async fn create_task(&self, task: &NewTask) -> Result<Reply<Task>> {
        validation::validate_new_task(task).map_err(Error::Validation)?;
        let resp = self
            .http
            .post(format!("{}/task/create-task", self.base_url))
            .json(task)
            .send()
            .await?;
        Self::parse_envelope(resp).await
    }

    /// List every task, newest first (GET /task/get-all-task).
    pub async fn list_tasks(&self) -> Result<Reply<Vec<Task>>> {
        let resp = self
            .http
            .get(format!("{}/task/get-all-task", self.base_url))
            .send()
            .await?;
        Self::parse_envelope(resp).await
    }

    /// Get a single task (GET /task/show-task/{id}).
    pub async fn show_task(&self, task_id: Uuid) -> Result<Reply<Task>> {
        let resp = self
            .http
            .get(format!("{}/task/show-task/{}", self.base_url, task_id))
            .send()
            .await?;
        Self::parse_envelope(resp).await
    }

    /// Update a task (PUT /task/update-task/{id}).
    ///
    /// Present fields are validated locally first; on failure no request is sent.
    pub async fn update_task(&self, task_id: Uuid, update: &UpdateTask) -> Result<Reply<Task>> {
        validation::validate_update(update).map_err(Error::Validation)?;
        let resp = self
            .http
            .put(format!("{}/task/update-task/{}", self.base_url, task_id))
            .json(update)
            .send()
            .await?;
        Self::parse_envelope(resp).await
    }

    /// Delete a task (DELETE /task/delete-task/{id}).
    pub async fn delete_task(&self, task_id: Uuid) -> Result<Reply<()>> {
        let resp = self
            .http
            .delete(format!("{}/task/delete-task/{}", self.base_url, task_id))
            .send()
            .await?;
        let envelope: Envelope<serde_json::Value> = Self::read_envelope(resp).await?;
        Ok(Reply {
            message: envelope.message,
            data: (),
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Reply<T>> {
        let envelope: Envelope<T> = Self::read_envelope(resp).await?;
        match envelope.task_data {
            Some(data) => Ok(Reply {
                message: envelope.message,
                data,
            }),
            None => Err(Error::Deserialize(format!(
                "response to '{}' carried no taskData",
                envelope.message
            ))),
        }
    }

    /// Read an envelope, turning HTTP errors and `status: false` into [`Error::Api`].
    async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Envelope<T>> {
        if !resp.status().is_success() {
            return Err(Self::make_api_error(resp).await);
        }
        let status = resp.status().as_u16();
        let envelope: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| Error::Deserialize(e.to_string()))?;
        if !envelope.status {
            return Err(Error::Api {
                status,
                message: envelope.message,
                errors: envelope.errors,
            });
        }
        Ok(envelope)
    }

    async fn make_api_error(resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        match resp.json::<error::ApiErrorBody>().await {
            Ok(body) => Error::Api {
                status,
                message: body.message.unwrap_or_else(|| "Unknown error".into()),
                errors: body.errors,
            },
            Err(_) => Error::Api {
                status,
                message: format!("HTTP {}", status),
                errors: None,
            },
        }
    }
}
