//! opsboard-fleet - Health aggregation over agent log sources
//!
//! Every `.log` file in the log directory is one monitored job. This crate
//! turns those files into the pieces of a dashboard snapshot:
//!
//! ```text
//!                       ┌──────────────────────┐
//!                       │   SummaryComposer    │
//!                       └──────────┬───────────┘
//!          ┌───────────────┬───────┴───────┬────────────────┐
//!          ▼               ▼               ▼                ▼
//!   gateway_status    fleet::aggregate  UsageEstimator   list_files
//!   (watchdog log)    (all sources)     (first 5)
//!          │               │               │                │
//!          └───────────────┴───────┬───────┴────────────────┘
//!                                  ▼
//!                        dyn LogSource (local / mock)
//! ```
//!
//! All four branches run concurrently and share no state.

pub mod composer;
pub mod fleet;
pub mod gateway;
pub mod jobs;
pub mod usage;

pub use composer::{SummaryComposer, COMPOSE_FAILED, FILE_VIEW_LIMIT, LOGS_DIR_MISSING};
pub use gateway::{infer_gateway, DEFAULT_GATEWAY_SOURCE};
pub use jobs::extract_job;
pub use usage::{LogVolumeEstimator, UsageEstimator};

// Re-export core types for convenience
pub use opsboard_core::{LogSource, SourceError, SourceResult};
