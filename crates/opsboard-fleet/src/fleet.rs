//! Fleet aggregation - every log source treated as one monitored job

use futures::future;
use futures::stream::{self, StreamExt};
use opsboard_core::{FleetReport, JobStatus, LogSource, RunTally, SourceResult};
use tracing::{debug, warn};

use crate::jobs::extract_job;

/// Entries read per source
pub const FLEET_READ_LIMIT: usize = 200;

/// Jobs kept after sorting
pub const FLEET_MAX_JOBS: usize = 10;

/// Source reads in flight at once
pub const MAX_CONCURRENT_READS: usize = 8;

/// Build the jobs view for every `.log` source.
///
/// Sources that fail to read are dropped; only a failure to list the
/// directory is returned as an error.
pub async fn aggregate(source: &dyn LogSource) -> SourceResult<FleetReport> {
    let ids = source.list_sources().await?;
    let reads: Vec<_> = ids.iter().map(|id| read_job(source, id)).collect();

    let jobs: Vec<JobStatus> = stream::iter(reads)
        // Ordered so equal timestamps keep a stable order across snapshots
        .buffered(MAX_CONCURRENT_READS)
        .filter_map(future::ready)
        .collect()
        .await;

    debug!(jobs = jobs.len(), "Extracted job statuses");
    Ok(rank_jobs(jobs))
}

async fn read_job(source: &dyn LogSource, id: &str) -> Option<JobStatus> {
    match source.read_tail(id, FLEET_READ_LIMIT).await {
        Ok(entries) => extract_job(id, &entries),
        Err(e) => {
            warn!(source = %id, error = %e, "Dropping unreadable log source");
            None
        }
    }
}

/// Sort newest first, keep the top [`FLEET_MAX_JOBS`] and tally them.
///
/// `last24h` counts outcomes over the kept jobs only. It is not filtered by
/// time despite its name.
pub fn rank_jobs(mut jobs: Vec<JobStatus>) -> FleetReport {
    // None sorts after every Some when reversed
    jobs.sort_by(|a, b| b.last_run_at.cmp(&a.last_run_at));
    jobs.truncate(FLEET_MAX_JOBS);

    FleetReport {
        last24h: RunTally::from_jobs(&jobs),
        jobs,
    }
}
