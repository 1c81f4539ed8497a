use std::iter::FusedIterator;

use crate::task::Task;

use super::TaskScheduler;

/// Iterator returned by [`TaskScheduler::drain`].
///
/// Yields tasks in non-increasing priority order. Dropping it early leaves
/// the remaining tasks resident.
#[derive(Debug)]
pub struct Drain<'a> {
    scheduler: &'a mut TaskScheduler,
}

impl<'a> Drain<'a> {
    pub(super) fn new(scheduler: &'a mut TaskScheduler) -> Self {
        Self { scheduler }
    }
}

impl Iterator for Drain<'_> {
    type Item = Task;

    fn next(&mut self) -> Option<Task> {
        self.scheduler.get_task()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.scheduler.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Drain<'_> {}

impl FusedIterator for Drain<'_> {}

/// Adds every task under the scheduler's duplicate policy. Under `Reject`
/// a duplicate is skipped (and counted in the metrics).
impl Extend<Task> for TaskScheduler {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        for task in iter {
            // Rejections are already logged and counted by add_task.
            let _ = self.add_task(task.identifier, task.priority);
        }
    }
}

impl FromIterator<Task> for TaskScheduler {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut scheduler = TaskScheduler::new();
        scheduler.extend(iter);
        scheduler
    }
}
