pub mod config;
pub mod error;

pub use config::{Config, DuplicatePolicy, SchedulerSettings, MAX_CAPACITY};
pub use error::*;
