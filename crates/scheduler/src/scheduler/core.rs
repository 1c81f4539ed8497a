use tracing::{debug, warn};

use taskheap_core::{DuplicatePolicy, SchedulerSettings};

use crate::error::SchedulerError;
use crate::heap::IndexedMaxHeap;
use crate::metrics::SchedulerMetrics;
use crate::task::{AddOutcome, Priority, Task, TaskId};

use super::Drain;

/// Single-threaded priority scheduler.
///
/// Holds resident tasks in an [`IndexedMaxHeap`] so the highest-priority
/// task is always at hand and any task's priority can be changed by
/// identifier in O(log n).
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    pub(super) heap: IndexedMaxHeap<TaskId, Priority>,
    settings: SchedulerSettings,
    pub(super) metrics: SchedulerMetrics,
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler {
    /// Create an empty scheduler with default settings.
    pub fn new() -> Self {
        Self::with_settings(SchedulerSettings::default())
    }

    /// Create an empty scheduler with the given settings.
    ///
    /// At most [`MAX_CAPACITY`](taskheap_core::MAX_CAPACITY) slots are
    /// reserved up front regardless of `settings.capacity`.
    pub fn with_settings(settings: SchedulerSettings) -> Self {
        Self {
            heap: IndexedMaxHeap::with_capacity(settings.reserved_capacity()),
            settings,
            metrics: SchedulerMetrics::default(),
        }
    }

    /// Create an empty scheduler that applies `policy` to duplicate adds.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self::with_settings(SchedulerSettings {
            duplicate_policy: policy,
            ..SchedulerSettings::default()
        })
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.settings.duplicate_policy
    }

    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }

    /// Number of resident tasks.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, identifier: TaskId) -> bool {
        self.heap.contains(&identifier)
    }

    /// Current priority of a resident task.
    pub fn priority_of(&self, identifier: TaskId) -> Option<Priority> {
        self.heap.priority_of(&identifier)
    }

    /// Schedule a new task.
    ///
    /// If `identifier` is already resident the configured
    /// [`DuplicatePolicy`] decides: `Reject` returns
    /// [`SchedulerError::DuplicateTask`] and leaves the scheduler untouched,
    /// `Overwrite` replaces the resident task's priority.
    pub fn add_task(
        &mut self,
        identifier: TaskId,
        priority: Priority,
    ) -> Result<AddOutcome, SchedulerError> {
        match self.settings.duplicate_policy {
            DuplicatePolicy::Reject if self.heap.contains(&identifier) => {
                self.metrics.duplicates_rejected += 1;
                warn!(task_id = identifier, priority, "Rejected duplicate task");
                return Err(SchedulerError::DuplicateTask(identifier));
            }
            DuplicatePolicy::Overwrite => {
                if let Some(previous) = self.reprioritize(identifier, priority) {
                    self.metrics.duplicates_overwritten += 1;
                    return Ok(AddOutcome::Updated { previous });
                }
            }
            DuplicatePolicy::Reject => {}
        }

        self.heap.push(identifier, priority);
        self.metrics.record_insert(self.heap.len());
        debug!(task_id = identifier, priority, resident = self.heap.len(), "Task added");
        Ok(AddOutcome::Inserted)
    }

    /// Change the priority of a resident task.
    ///
    /// Returns `false` without touching anything when `identifier` is not
    /// resident.
    pub fn change_task_priority(&mut self, identifier: TaskId, new_priority: Priority) -> bool {
        if self.reprioritize(identifier, new_priority).is_some() {
            true
        } else {
            self.metrics.priority_change_misses += 1;
            debug!(task_id = identifier, "Priority change for unknown task ignored");
            false
        }
    }

    /// Remove and return the highest-priority task, or `None` when empty.
    ///
    /// Among tasks sharing the top priority, which one comes out first is
    /// unspecified.
    pub fn get_task(&mut self) -> Option<Task> {
        let (identifier, priority) = self.heap.pop()?;
        self.metrics.tasks_dispatched += 1;
        debug!(task_id = identifier, priority, resident = self.heap.len(), "Task dispatched");
        Some(Task::new(identifier, priority))
    }

    /// The task `get_task` would return next, without removing it.
    pub fn peek(&self) -> Option<Task> {
        self.heap.peek().map(Task::from)
    }

    /// Cancel a resident task, returning its final state.
    pub fn remove_task(&mut self, identifier: TaskId) -> Option<Task> {
        let priority = self.heap.remove(&identifier)?;
        self.metrics.tasks_removed += 1;
        debug!(task_id = identifier, priority, "Task removed");
        Some(Task::new(identifier, priority))
    }

    /// Copies of all resident tasks, highest priority first. Equal
    /// priorities are ordered by identifier.
    pub fn snapshot(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.heap.iter().map(Task::from).collect();
        tasks.sort_unstable_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        tasks
    }

    /// Drop every resident task. Metrics are kept.
    pub fn clear(&mut self) {
        debug!(resident = self.heap.len(), "Scheduler cleared");
        self.heap.clear();
    }

    /// Remove tasks in dispatch order. Each yielded task counts as
    /// dispatched.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain::new(self)
    }

    fn reprioritize(&mut self, identifier: TaskId, priority: Priority) -> Option<Priority> {
        let previous = self.heap.update(&identifier, priority)?;
        self.metrics.priority_changes += 1;
        debug!(task_id = identifier, previous, priority, "Task priority changed");
        Some(previous)
    }
}
