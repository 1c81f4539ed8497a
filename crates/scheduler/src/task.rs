use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-supplied task identifier, unique among resident tasks.
pub type TaskId = i64;

/// Task priority. Larger values are dispatched first.
pub type Priority = i64;

/// A schedulable unit of work as seen by callers.
///
/// Tasks are plain values: the scheduler hands out copies, never handles
/// into its own storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub identifier: TaskId,
    pub priority: Priority,
}

impl Task {
    pub fn new(identifier: TaskId, priority: Priority) -> Self {
        Self {
            identifier,
            priority,
        }
    }
}

impl From<(TaskId, Priority)> for Task {
    fn from((identifier, priority): (TaskId, Priority)) -> Self {
        Self::new(identifier, priority)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} (priority {})", self.identifier, self.priority)
    }
}

/// Result of a successful [`add_task`](crate::TaskScheduler::add_task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    /// A new resident task was created.
    Inserted,
    /// The identifier was already resident and its priority was replaced.
    Updated { previous: Priority },
}
