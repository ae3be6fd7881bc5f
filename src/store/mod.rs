//! Task storage.
//!
//! [`TaskStore`] is the only way handlers reach task records. One handle is
//! opened in `main` and shared through `AppState`; backends differ only in
//! where the records live.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{Config, StoreBackend};
use crate::error::{TaskError, TaskResult};
use crate::lifecycle::{TransitionPolicy, can_transition};
use crate::metrics;
use crate::models::{Task, TaskChanges, TaskStatus};
use crate::validation;

pub use memory::MemoryTaskStore;
pub use postgres::{MIGRATIONS, PgTaskStore, initialize_db_pool, run_migrations};

/// Keyed storage of task records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Insert a new `Pending` task with a fresh id.
    async fn create(&self, title: String, description: String) -> TaskResult<Task>;

    /// All tasks, newest first.
    async fn list(&self) -> TaskResult<Vec<Task>>;

    async fn get(&self, id: Uuid) -> TaskResult<Task>;

    /// Replace the provided fields and refresh `updated_at`.
    async fn update(&self, id: Uuid, changes: TaskChanges) -> TaskResult<Task>;

    async fn delete(&self, id: Uuid) -> TaskResult<()>;

    /// Cheap round trip used for health checks.
    async fn ping(&self) -> TaskResult<()>;
}

/// Shared handle injected into request handlers.
pub type StoreHandle = Arc<dyn TaskStore>;

/// Open the store selected by `config`, running migrations when asked to.
pub async fn open(config: &Config) -> TaskResult<StoreHandle> {
    match config.store.backend {
        StoreBackend::Memory => {
            log::warn!("Using in-memory task store; tasks are lost on restart");
            Ok(Arc::new(MemoryTaskStore::new(config.transition_policy)))
        }
        StoreBackend::Postgres => {
            let url = config.store.database_url.as_deref().ok_or_else(|| {
                TaskError::Internal("DATABASE_URL is required for the postgres store".to_string())
            })?;
            if config.store.run_migrations {
                run_migrations(url).await?;
            }
            let pool = initialize_db_pool(url, &config.pool).await?;
            Ok(Arc::new(PgTaskStore::new(pool, config)))
        }
    }
}

fn check_new_task(title: &str, description: &str) -> TaskResult<()> {
    validation::validate_task_fields(title, description).map_err(TaskError::Validation)
}

fn check_changes(policy: TransitionPolicy, current: TaskStatus, changes: &TaskChanges) -> TaskResult<()> {
    validation::validate_changes(changes).map_err(TaskError::Validation)?;
    if let Some(to) = changes.status
        && !can_transition(policy, current, to)
    {
        return Err(TaskError::InvalidTransition { from: current, to });
    }
    Ok(())
}

fn record_transition(from: TaskStatus, to: TaskStatus) {
    if from != to {
        metrics::record_status_transition(from.as_str(), to.as_str());
    }
}
