use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use uuid::Uuid;

use super::{TaskStore, check_changes, check_new_task, record_transition};
use crate::config::{Config, PoolConfig};
use crate::error::{TaskError, TaskResult};
use crate::lifecycle::TransitionPolicy;
use crate::metrics;
use crate::models::{NewTask, Task, TaskChanges, TaskChangeset};
use crate::schema::task;
use crate::{Conn, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending embedded migrations.
///
/// Migrations need a synchronous connection, so this runs on the blocking pool.
pub async fn run_migrations(database_url: &str) -> TaskResult<()> {
    let url = database_url.to_string();
    let applied = tokio::task::spawn_blocking(move || -> TaskResult<usize> {
        let mut conn = <AsyncConnectionWrapper<AsyncPgConnection> as diesel::Connection>::establish(&url)
            .map_err(|e| TaskError::Internal(format!("Failed to connect for migrations: {}", e)))?;
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| TaskError::Internal(format!("Failed to run migrations: {}", e)))?;
        Ok(versions.len())
    })
    .await
    .map_err(|e| TaskError::Internal(format!("Migration task panicked: {}", e)))??;

    log::info!("Applied {} pending migration(s)", applied);
    Ok(())
}

/// Build the connection pool. Created once at startup and owned by the store.
pub async fn initialize_db_pool(database_url: &str, config: &PoolConfig) -> TaskResult<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder()
        .max_size(config.max_size)
        .min_idle(Some(config.min_idle))
        .connection_timeout(config.connection_timeout)
        .build(manager)
        .await
        .map_err(|e| TaskError::Pool(e.to_string()))
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgTaskStore {
    pool: DbPool,
    policy: TransitionPolicy,
    acquire_retries: u32,
    retry_delay: Duration,
    slow_query_threshold_ms: u64,
}

impl PgTaskStore {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            policy: config.transition_policy,
            acquire_retries: config.pool.acquire_retries,
            retry_delay: config.pool.retry_delay,
            slow_query_threshold_ms: config.observability.slow_query_threshold_ms,
        }
    }

    /// Get a connection from the pool, retrying a few times before giving up.
    async fn conn(&self) -> TaskResult<Conn<'_>> {
        let mut last_error = None;
        let effective_retries = self.acquire_retries.max(1);

        for attempt in 0..effective_retries {
            match self.pool.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    last_error = Some(e);
                    if attempt + 1 < effective_retries {
                        log::warn!(
                            "Failed to acquire connection (attempt {}/{}), retrying in {}ms",
                            attempt + 1,
                            effective_retries,
                            self.retry_delay.as_millis()
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        log::error!(
            "Failed to acquire connection after {} attempts: {}",
            effective_retries,
            message
        );
        Err(TaskError::Pool(message))
    }

    fn observe(&self, operation: &str, started: Instant) {
        metrics::record_store_operation(
            operation,
            started.elapsed().as_secs_f64(),
            self.slow_query_threshold_ms,
        );
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, title: String, description: String) -> TaskResult<Task> {
        check_new_task(&title, &description)?;
        let started = Instant::now();
        let mut conn = self.conn().await?;

        let new_task = NewTask::new(title, description);
        let created = diesel::insert_into(task::table)
            .values(&new_task)
            .returning(Task::as_returning())
            .get_result(&mut conn)
            .await?;

        self.observe("create", started);
        Ok(created)
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let started = Instant::now();
        let mut conn = self.conn().await?;

        let tasks = task::table
            .select(Task::as_select())
            .order((task::created_at.desc(), task::seq.desc()))
            .load(&mut conn)
            .await?;

        self.observe("list", started);
        Ok(tasks)
    }

    async fn get(&self, id: Uuid) -> TaskResult<Task> {
        let started = Instant::now();
        let mut conn = self.conn().await?;

        let found = task::table
            .find(id)
            .select(Task::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        self.observe("get", started);
        found.ok_or(TaskError::TaskNotFound(id))
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> TaskResult<Task> {
        let started = Instant::now();
        let policy = self.policy;
        let mut conn = self.conn().await?;

        // Lock the row so the transition check and the write see the same status.
        // If this future is dropped mid-transaction the pool discards the connection.
        let (before, updated) = conn
            .transaction::<_, TaskError, _>(|conn| {
                async move {
                    let current = task::table
                        .find(id)
                        .select(Task::as_select())
                        .for_update()
                        .first(&mut *conn)
                        .await
                        .optional()?
                        .ok_or(TaskError::TaskNotFound(id))?;

                    check_changes(policy, current.status, &changes)?;

                    let updated = diesel::update(task::table.find(id))
                        .set(TaskChangeset::new(changes, Utc::now()))
                        .returning(Task::as_returning())
                        .get_result(conn)
                        .await?;

                    Ok((current.status, updated))
                }
                .scope_boxed()
            })
            .await?;

        record_transition(before, updated.status);
        self.observe("update", started);
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<()> {
        let started = Instant::now();
        let mut conn = self.conn().await?;

        let count = diesel::delete(task::table.find(id))
            .execute(&mut conn)
            .await?;

        self.observe("delete", started);
        match count {
            0 => Err(TaskError::TaskNotFound(id)),
            _ => Ok(()),
        }
    }

    async fn ping(&self) -> TaskResult<()> {
        let mut conn = self.conn().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }
}
