//! opsboard-core - Core types for the opsboard status backend
//!
//! This crate provides the log line parser, the models that make up a
//! dashboard snapshot, and the [`LogSource`] abstraction that lets the same
//! aggregation run against a real log directory or canned mock data.

pub mod error;
pub mod models;
pub mod parser;
pub mod source;

pub use error::{SourceError, SourceResult};
pub use models::*;
pub use source::{is_log_source, is_plain_file_name, LogSource, LOG_SUFFIX};
