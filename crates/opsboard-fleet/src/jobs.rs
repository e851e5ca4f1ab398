//! Job status extraction from one source's entries

use opsboard_core::{JobState, JobStatus, LogEntry, LOG_SUFFIX};

/// Entries examined for recent errors
pub const JOB_WINDOW: usize = 50;

/// More than this many recent errors marks a job as failed
pub const JOB_ERROR_THRESHOLD: usize = 5;

/// Display name for a source: `ai_news_briefing.log` -> `ai news briefing`
pub fn job_name(source_id: &str) -> String {
    source_id
        .strip_suffix(LOG_SUFFIX)
        .unwrap_or(source_id)
        .replace('_', " ")
}

/// Derive a job's state from its entries (file order, oldest first).
///
/// Returns `None` for a source with no entries. Only `Success` and `Error`
/// are produced here; 1 to 5 recent errors still count as success.
pub fn extract_job(source_id: &str, entries: &[LogEntry]) -> Option<JobStatus> {
    let last = entries.last()?;
    let window = &entries[entries.len().saturating_sub(JOB_WINDOW)..];
    let recent_errors = window.iter().filter(|e| e.is_error()).count();

    let status = if recent_errors > JOB_ERROR_THRESHOLD {
        JobState::Error
    } else {
        JobState::Success
    };

    Some(JobStatus {
        name: job_name(source_id),
        last_run: Some(last.timestamp.clone()),
        last_run_at: Some(last.recorded_at),
        status,
        log_count: entries.len(),
        recent_errors,
    })
}
