use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{TaskStore, check_changes, check_new_task, record_transition};
use crate::error::{TaskError, TaskResult};
use crate::lifecycle::TransitionPolicy;
use crate::models::{NewTask, Task, TaskChanges};

#[derive(Default)]
struct Inner {
    /// Records keyed by insertion sequence.
    tasks: BTreeMap<u64, Task>,
    index: HashMap<Uuid, u64>,
    next_seq: u64,
}

/// Process-local store. Every mutation happens under one write lock, so a
/// write to a record is complete before any later request observes it.
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
    policy: TransitionPolicy,
}

impl MemoryTaskStore {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new(TransitionPolicy::default())
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, title: String, description: String) -> TaskResult<Task> {
        check_new_task(&title, &description)?;

        let mut inner = self.inner.write();
        let task = Task::from(NewTask::new(title, description));
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.index.insert(task.id, seq);
        inner.tasks.insert(seq, task.clone());
        Ok(task)
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let inner = self.inner.read();
        let mut tasks: Vec<(u64, Task)> = inner
            .tasks
            .iter()
            .map(|(seq, task)| (*seq, task.clone()))
            .collect();
        // Newest first; insertion order breaks timestamp ties.
        tasks.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });
        Ok(tasks.into_iter().map(|(_, task)| task).collect())
    }

    async fn get(&self, id: Uuid) -> TaskResult<Task> {
        let inner = self.inner.read();
        inner
            .index
            .get(&id)
            .and_then(|seq| inner.tasks.get(seq))
            .cloned()
            .ok_or(TaskError::TaskNotFound(id))
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> TaskResult<Task> {
        let mut inner = self.inner.write();
        let seq = *inner.index.get(&id).ok_or(TaskError::TaskNotFound(id))?;
        let task = inner
            .tasks
            .get_mut(&seq)
            .ok_or(TaskError::TaskNotFound(id))?;

        check_changes(self.policy, task.status, &changes)?;

        let before = task.status;
        changes.apply_to(task, Utc::now());
        record_transition(before, task.status);
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> TaskResult<()> {
        let mut inner = self.inner.write();
        let seq = inner.index.remove(&id).ok_or(TaskError::TaskNotFound(id))?;
        inner.tasks.remove(&seq);
        Ok(())
    }

    async fn ping(&self) -> TaskResult<()> {
        Ok(())
    }
}
