//! Composite summary and the response envelope

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{FleetReport, GatewayStatus, JobStatus, LogEntry, RunTally, UsageEstimate};

/// File-level metadata for one log source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileInfo {
    /// File name within the log directory
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// Parsed tail of a single log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFileView {
    pub file_name: String,
    pub entries: Vec<LogEntry>,
}

/// Everything the dashboard needs in one snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub gateway: GatewayStatus,
    /// Tally over `jobs`; see [`FleetReport::last24h`]
    pub last24h: RunTally,
    pub jobs: Vec<JobStatus>,
    pub usage: UsageEstimate,
    pub log_files: Vec<LogFileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_directory: Option<String>,
}

impl FleetSummary {
    /// All-default data returned when logs cannot be read.
    ///
    /// Means "no data", never "all healthy".
    pub fn fallback() -> Self {
        Self::default()
    }

    /// Merge the independently computed parts
    pub fn assemble(
        gateway: GatewayStatus,
        fleet: FleetReport,
        usage: UsageEstimate,
        log_files: Vec<LogFileInfo>,
        log_directory: Option<String>,
    ) -> Self {
        Self {
            gateway,
            last24h: fleet.last24h,
            jobs: fleet.jobs,
            usage,
            log_files,
            log_directory,
        }
    }
}

/// Response envelope shared by every status view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    pub data: T,
    pub last_updated: DateTime<Utc>,
}

impl<T> Report<T> {
    /// Successful report stamped with the current time
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            fallback: false,
            data,
            last_updated: Utc::now(),
        }
    }
}

impl Report<FleetSummary> {
    /// Fallback report carrying the default summary and a reason
    pub fn fallback(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            fallback: true,
            data: FleetSummary::fallback(),
            last_updated: Utc::now(),
        }
    }

    /// Whether this is the "no data" fallback
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}
