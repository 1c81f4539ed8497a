//! In-memory priority task scheduler.
//!
//! Tasks carry a caller-chosen identifier and a mutable integer priority.
//! The scheduler always hands out the highest-priority resident task and
//! supports O(log n) priority changes by identifier, backed by an
//! [`IndexedMaxHeap`] that tracks each identifier's heap slot.

pub mod error;
pub mod heap;
pub mod metrics;
pub mod scheduler;
pub mod script;
pub mod task;

pub use error::SchedulerError;
pub use heap::IndexedMaxHeap;
pub use metrics::SchedulerMetrics;
pub use scheduler::{Drain, TaskScheduler};
pub use script::{parse_script, run_script, Command, Event};
pub use task::{AddOutcome, Priority, Task, TaskId};
pub use taskheap_core::{DuplicatePolicy, SchedulerSettings};
