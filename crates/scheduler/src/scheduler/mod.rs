//! Priority task scheduler facade.
//!
//! Split into focused submodules:
//! - `core`: TaskScheduler struct, constructors, and the add/change/get operations
//! - `drain`: draining iterator and collection trait impls

mod core;
mod drain;

pub use self::core::TaskScheduler;
pub use self::drain::Drain;
