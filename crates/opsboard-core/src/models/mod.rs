//! Shared data models for opsboard

mod health;
mod job;
mod log;
mod summary;

pub use health::*;
pub use job::*;
pub use log::*;
pub use summary::*;
