//! Summary composition
//!
//! Fans out to the gateway inferrer, fleet aggregator, usage estimator and
//! file listing, and merges their results into one [`Report`]. Nothing is
//! cached; every call re-reads the log source.

use std::sync::Arc;

use opsboard_core::{
    FleetReport, FleetSummary, GatewayStatus, LogFileInfo, LogFileView, LogSource, Report,
    SourceError, SourceResult, UsageEstimate,
};
use tracing::{debug, error};

use crate::fleet;
use crate::gateway::{self, DEFAULT_GATEWAY_SOURCE};
use crate::usage::{LogVolumeEstimator, UsageEstimator};

/// Reason reported when the log storage is missing
pub const LOGS_DIR_MISSING: &str = "Logs directory not found";

/// Reason reported when composition fails unexpectedly
pub const COMPOSE_FAILED: &str = "Failed to parse logs";

/// Log files listed in the summary
pub const SUMMARY_MAX_FILES: usize = 10;

/// Entries returned by the single-file view
pub const FILE_VIEW_LIMIT: usize = 100;

/// Builds dashboard snapshots from a [`LogSource`]
#[derive(Clone)]
pub struct SummaryComposer {
    source: Arc<dyn LogSource>,
    usage: Arc<dyn UsageEstimator>,
    gateway_source: String,
}

impl SummaryComposer {
    /// Composer with the default gateway log and usage heuristic
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self {
            source,
            usage: Arc::new(LogVolumeEstimator::default()),
            gateway_source: DEFAULT_GATEWAY_SOURCE.to_string(),
        }
    }

    /// Use a different log file as the gateway health source
    pub fn with_gateway_source(mut self, gateway_source: impl Into<String>) -> Self {
        self.gateway_source = gateway_source.into();
        self
    }

    /// Replace the usage estimator
    pub fn with_usage_estimator(mut self, usage: Arc<dyn UsageEstimator>) -> Self {
        self.usage = usage;
        self
    }

    /// Underlying log source
    pub fn source(&self) -> &Arc<dyn LogSource> {
        &self.source
    }

    /// Name of the gateway log
    pub fn gateway_source(&self) -> &str {
        &self.gateway_source
    }

    /// Whether the log storage exists
    pub async fn is_available(&self) -> bool {
        self.source.is_available().await
    }

    /// Full snapshot; never fails.
    ///
    /// Missing storage or any unexpected error yields the fallback report.
    pub async fn compose(&self) -> Report<FleetSummary> {
        if !self.is_available().await {
            debug!(location = %self.source.location(), "Log storage missing, returning fallback");
            return Report::fallback(LOGS_DIR_MISSING);
        }

        match self.try_compose().await {
            Ok(summary) => Report::ok(summary),
            Err(e) => {
                error!(error = %e, "Failed to compose summary");
                Report::fallback(COMPOSE_FAILED)
            }
        }
    }

    async fn try_compose(&self) -> SourceResult<FleetSummary> {
        let (gateway, fleet, usage, files) =
            tokio::join!(self.gateway(), self.cron(), self.usage(), self.log_files());

        let mut files = files?;
        files.truncate(SUMMARY_MAX_FILES);
        let fleet = fleet?;

        debug!(
            jobs = fleet.jobs.len(),
            files = files.len(),
            "Composed summary"
        );

        Ok(FleetSummary::assemble(
            gateway?,
            fleet,
            usage,
            files,
            Some(self.source.location().to_string()),
        ))
    }

    /// Gateway view
    pub async fn gateway(&self) -> SourceResult<GatewayStatus> {
        gateway::gateway_status(self.source.as_ref(), &self.gateway_source).await
    }

    /// Jobs view
    pub async fn cron(&self) -> SourceResult<FleetReport> {
        fleet::aggregate(self.source.as_ref()).await
    }

    /// Usage view
    pub async fn usage(&self) -> UsageEstimate {
        self.usage.estimate(self.source.as_ref()).await
    }

    /// Every log file, newest modification first
    pub async fn log_files(&self) -> SourceResult<Vec<LogFileInfo>> {
        self.source.list_files().await
    }

    /// Last [`FILE_VIEW_LIMIT`] entries of one file
    pub async fn file(&self, name: &str) -> SourceResult<LogFileView> {
        if !self.source.contains(name).await? {
            return Err(SourceError::NotFound(name.to_string()));
        }

        let entries = self.source.read_tail(name, FILE_VIEW_LIMIT).await?;
        Ok(LogFileView {
            file_name: name.to_string(),
            entries,
        })
    }
}
