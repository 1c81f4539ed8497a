use serde::{Deserialize, Serialize};

/// Operation counters for a [`TaskScheduler`](crate::TaskScheduler).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerMetrics {
    /// Tasks that became resident through `add_task`.
    pub tasks_added: u64,
    /// Tasks handed out by `get_task`.
    pub tasks_dispatched: u64,
    /// Tasks cancelled through `remove_task`.
    pub tasks_removed: u64,
    /// Successful priority changes (including overwriting duplicate adds).
    pub priority_changes: u64,
    /// Priority changes addressed to a non-resident identifier.
    pub priority_change_misses: u64,
    /// Duplicate adds refused under the reject policy.
    pub duplicates_rejected: u64,
    /// Duplicate adds applied as priority changes under the overwrite policy.
    pub duplicates_overwritten: u64,
    /// Highest number of simultaneously resident tasks.
    pub peak_resident: usize,
}

impl SchedulerMetrics {
    pub(crate) fn record_insert(&mut self, resident: usize) {
        self.tasks_added += 1;
        self.peak_resident = self.peak_resident.max(resident);
    }

    /// Tasks that left the scheduler by any route.
    pub fn tasks_retired(&self) -> u64 {
        self.tasks_dispatched + self.tasks_removed
    }
}
