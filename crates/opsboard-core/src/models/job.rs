//! Job (log source) status models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Outcome classification of one job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Few or no recent errors
    Success,
    /// More recent errors than the tolerated threshold
    Error,
    /// Not produced by log aggregation; kept for the display contract
    Running,
    /// Not produced by log aggregation; kept for the display contract
    #[default]
    Unknown,
}

/// Derived state of one log source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// Human-readable job name
    pub name: String,
    /// Timestamp text of the newest entry
    pub last_run: Option<String>,
    /// Instant of the newest entry, used for ordering
    #[serde(skip)]
    pub last_run_at: Option<DateTime<Local>>,
    /// Outcome classification
    pub status: JobState,
    /// Number of entries read from the source
    pub log_count: usize,
    /// Error entries within the recent window
    pub recent_errors: usize,
}

/// Success/failure tally over the most recently run jobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

impl RunTally {
    /// Count job outcomes
    pub fn from_jobs(jobs: &[JobStatus]) -> Self {
        Self {
            total: jobs.len(),
            success: jobs
                .iter()
                .filter(|j| j.status == JobState::Success)
                .count(),
            failed: jobs.iter().filter(|j| j.status == JobState::Error).count(),
        }
    }
}

/// Jobs view of the fleet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    /// Tally over `jobs` (the ten most recently run), not a time window
    pub last24h: RunTally,
    /// Jobs, newest `last_run` first
    pub jobs: Vec<JobStatus>,
}
