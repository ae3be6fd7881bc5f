//! Client-side task board state.
//!
//! [`TaskBoard`] owns the local copy of the task list, the create form, the
//! filter query and the notification queue. Every user action sends exactly
//! one request through [`Client`]; while it is in flight the action is busy
//! and a second trigger is refused without touching the network.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{NewTask, Task, UpdateTask};
use crate::Client;

pub const SUCCESS_NOTIFICATION_TTL: Duration = Duration::from_secs(3);
pub const ERROR_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// A user action that issues one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingAction {
    Create,
    Update(Uuid),
    Delete(Uuid),
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::Create => f.write_str("create"),
            PendingAction::Update(id) => write!(f, "update of {}", id),
            PendingAction::Delete(id) => write!(f, "delete of {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

impl Notification {
    fn new(level: NotificationLevel, message: String) -> Self {
        let ttl = match level {
            NotificationLevel::Success => SUCCESS_NOTIFICATION_TTL,
            NotificationLevel::Error => ERROR_NOTIFICATION_TTL,
        };
        Self {
            level,
            message,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Default)]
struct BoardState {
    tasks: Vec<Task>,
    form: NewTask,
    query: String,
    notifications: Vec<Notification>,
}

/// Marks an action busy until dropped.
struct InFlight<'a> {
    actions: &'a Mutex<HashSet<PendingAction>>,
    action: PendingAction,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.actions.lock().remove(&self.action);
    }
}

pub struct TaskBoard {
    client: Client,
    state: Mutex<BoardState>,
    in_flight: Mutex<HashSet<PendingAction>>,
}

impl TaskBoard {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Mutex::new(BoardState::default()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    // =========================================================================
    // Local state
    // =========================================================================

    /// Tasks in server order (newest first).
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    pub fn form(&self) -> NewTask {
        self.state.lock().form.clone()
    }

    pub fn set_form(&self, title: impl Into<String>, description: impl Into<String>) {
        self.state.lock().form = NewTask::new(title, description);
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.state.lock().query = query.into();
    }

    /// Tasks whose title or description contains the current query, ignoring case.
    pub fn visible_tasks(&self) -> Vec<Task> {
        let state = self.state.lock();
        let needle = state.query.to_lowercase();
        state
            .tasks
            .iter()
            .filter(|task| {
                needle.is_empty()
                    || task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn is_busy(&self, action: PendingAction) -> bool {
        self.in_flight.lock().contains(&action)
    }

    /// Notifications that have not expired yet. Expired ones are dropped.
    pub fn notifications(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut state = self.state.lock();
        state.notifications.retain(|n| !n.is_expired(now));
        state.notifications.clone()
    }

    /// Drain all pending notifications, expired or not.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().notifications)
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        self.state
            .lock()
            .notifications
            .push(Notification::new(level, message));
    }

    fn notify_error(&self, err: &Error) {
        self.notify(NotificationLevel::Error, err.user_message());
    }

    fn begin(&self, action: PendingAction) -> Result<InFlight<'_>> {
        if !self.in_flight.lock().insert(action) {
            log::debug!("Refusing {}: already in flight", action);
            return Err(Error::Busy(action));
        }
        Ok(InFlight {
            actions: &self.in_flight,
            action,
        })
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Replace the local list with the server's. Tasks with a delete in
    /// flight stay hidden.
    pub async fn refresh(&self) -> Result<()> {
        match self.client.list_tasks().await {
            Ok(reply) => {
                let deleting: HashSet<Uuid> = self
                    .in_flight
                    .lock()
                    .iter()
                    .filter_map(|action| match action {
                        PendingAction::Delete(id) => Some(*id),
                        _ => None,
                    })
                    .collect();
                let mut tasks = reply.data;
                tasks.retain(|t| !deleting.contains(&t.id));
                self.state.lock().tasks = tasks;
                Ok(())
            }
            Err(e) => {
                self.notify_error(&e);
                Err(e)
            }
        }
    }

    /// Submit the create form. On success the form is cleared and the new
    /// task goes to the head of the list.
    pub async fn submit_create(&self) -> Result<Task> {
        let _guard = self.begin(PendingAction::Create)?;
        let form = self.form();

        match self.client.create_task(&form).await {
            Ok(reply) => {
                {
                    let mut state = self.state.lock();
                    state.form = NewTask::default();
                    // A refresh may already have brought the task in.
                    match state.tasks.iter_mut().find(|t| t.id == reply.data.id) {
                        Some(slot) => *slot = reply.data.clone(),
                        None => state.tasks.insert(0, reply.data.clone()),
                    }
                }
                self.notify(NotificationLevel::Success, reply.message);
                Ok(reply.data)
            }
            Err(e) => {
                // Field errors are reported inline by the caller, not as a toast.
                if !matches!(e, Error::Validation(_)) {
                    self.notify_error(&e);
                }
                Err(e)
            }
        }
    }

    /// Update a task and replace the local record in place.
    pub async fn update(&self, task_id: Uuid, update: UpdateTask) -> Result<Task> {
        let _guard = self.begin(PendingAction::Update(task_id))?;

        match self.client.update_task(task_id, &update).await {
            Ok(reply) => {
                {
                    let mut state = self.state.lock();
                    if let Some(slot) = state.tasks.iter_mut().find(|t| t.id == task_id) {
                        *slot = reply.data.clone();
                    }
                }
                self.notify(NotificationLevel::Success, reply.message);
                Ok(reply.data)
            }
            Err(e) => {
                if !matches!(e, Error::Validation(_)) {
                    self.notify_error(&e);
                }
                Err(e)
            }
        }
    }

    /// Delete a task. The record is removed before the request is sent and
    /// put back at its previous position if the request fails.
    pub async fn delete(&self, task_id: Uuid) -> Result<()> {
        let _guard = self.begin(PendingAction::Delete(task_id))?;

        let removed = {
            let mut state = self.state.lock();
            state
                .tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|index| (index, state.tasks.remove(index)))
        };

        match self.client.delete_task(task_id).await {
            Ok(reply) => {
                self.state.lock().tasks.retain(|t| t.id != task_id);
                self.notify(NotificationLevel::Success, reply.message);
                Ok(())
            }
            Err(e) => {
                if let Some((index, task)) = removed {
                    let mut state = self.state.lock();
                    if !state.tasks.iter().any(|t| t.id == task.id) {
                        let index = index.min(state.tasks.len());
                        state.tasks.insert(index, task);
                    }
                }
                self.notify_error(&e);
                Err(e)
            }
        }
    }
}
