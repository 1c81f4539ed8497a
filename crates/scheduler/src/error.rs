//! Scheduler error types.

use thiserror::Error;

use crate::task::TaskId;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("task {0} is already scheduled")]
    DuplicateTask(TaskId),

    #[error("script line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Core(#[from] taskheap_core::CoreError),
}

impl SchedulerError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
