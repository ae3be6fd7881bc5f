//! Status transition policy.
//!
//! Every status change goes through [`can_transition`]. The store holds the
//! active [`TransitionPolicy`], so tightening the rules is a configuration
//! change rather than a change at each call site.
//!
//! ```text
//! Pending --> Running --> Completed
//!    |           |
//!    +-----------+------> Failed
//! ```

use std::str::FromStr;

use crate::models::TaskStatus;

/// Which status changes the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may be set from any other.
    #[default]
    Free,
    /// Only the edges of the lifecycle diagram are allowed.
    Lifecycle,
}

impl TransitionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPolicy::Free => "free",
            TransitionPolicy::Lifecycle => "lifecycle",
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(TransitionPolicy::Free),
            "lifecycle" => Ok(TransitionPolicy::Lifecycle),
            other => Err(format!(
                "unknown transition policy '{}', expected 'free' or 'lifecycle'",
                other
            )),
        }
    }
}

/// Whether `from -> to` is permitted under `policy`.
///
/// Re-setting the current status is always allowed.
pub fn can_transition(policy: TransitionPolicy, from: TaskStatus, to: TaskStatus) -> bool {
    if from == to {
        return true;
    }
    match policy {
        TransitionPolicy::Free => true,
        TransitionPolicy::Lifecycle => matches!(
            (from, to),
            (TaskStatus::Pending, TaskStatus::Running)
                | (TaskStatus::Running, TaskStatus::Completed)
                | (TaskStatus::Pending, TaskStatus::Failed)
                | (TaskStatus::Running, TaskStatus::Failed)
        ),
    }
}
