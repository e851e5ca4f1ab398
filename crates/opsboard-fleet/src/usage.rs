//! Language-model usage estimation
//!
//! No metering API is available, so usage is approximated from how much the
//! agent logged in the last day. The [`UsageEstimator`] trait lets a real
//! metering integration replace the heuristic without changing the
//! [`UsageEstimate`] shape.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local};
use opsboard_core::{LogEntry, LogSource, SourceResult, UsageEstimate};
use tracing::{debug, warn};

/// Sources sampled for the estimate
pub const USAGE_MAX_SOURCES: usize = 5;

/// Entries read per sampled source
pub const USAGE_READ_LIMIT: usize = 50;

/// Assumed tokens per log entry
pub const TOKENS_PER_ENTRY: u64 = 500;

/// Assumed cost per token (USD)
pub const COST_PER_TOKEN: f64 = 0.000_002;

/// Produces a usage estimate from the log source
#[async_trait]
pub trait UsageEstimator: Send + Sync {
    /// Estimate recent usage. Never fails; returns a zero estimate instead.
    async fn estimate(&self, source: &dyn LogSource) -> UsageEstimate;
}

/// Heuristic: one entry in the last 24h is one call of fixed token size
#[derive(Debug, Clone)]
pub struct LogVolumeEstimator {
    pub max_sources: usize,
    pub read_limit: usize,
    pub tokens_per_entry: u64,
    pub cost_per_token: f64,
}

impl Default for LogVolumeEstimator {
    fn default() -> Self {
        Self {
            max_sources: USAGE_MAX_SOURCES,
            read_limit: USAGE_READ_LIMIT,
            tokens_per_entry: TOKENS_PER_ENTRY,
            cost_per_token: COST_PER_TOKEN,
        }
    }
}

impl LogVolumeEstimator {
    async fn sample(&self, source: &dyn LogSource) -> SourceResult<Vec<LogEntry>> {
        let mut entries = Vec::new();
        for id in source.list_sources().await?.iter().take(self.max_sources) {
            match source.read_tail(id, self.read_limit).await {
                Ok(read) => entries.extend(read),
                Err(e) => warn!(source = %id, error = %e, "Skipping unreadable source"),
            }
        }
        Ok(entries)
    }

    /// Estimate from already-read entries relative to `now`
    pub fn estimate_entries(&self, entries: &[LogEntry], now: DateTime<Local>) -> UsageEstimate {
        let cutoff = now - Duration::hours(24);
        let recent: Vec<&LogEntry> = entries.iter().filter(|e| e.recorded_at > cutoff).collect();

        let calls = recent.len() as u64;
        let estimated_tokens = calls * self.tokens_per_entry;

        UsageEstimate {
            estimated_tokens,
            estimated_cost: round4(estimated_tokens as f64 * self.cost_per_token),
            last24h_calls: calls,
            last_reset: recent
                .iter()
                .min_by_key(|e| e.recorded_at)
                .map(|e| e.timestamp.clone()),
        }
    }
}

#[async_trait]
impl UsageEstimator for LogVolumeEstimator {
    async fn estimate(&self, source: &dyn LogSource) -> UsageEstimate {
        match self.sample(source).await {
            Ok(entries) => {
                let estimate = self.estimate_entries(&entries, Local::now());
                debug!(calls = estimate.last24h_calls, "Estimated usage");
                estimate
            }
            Err(e) => {
                warn!(error = %e, "Usage estimation failed, reporting zero");
                UsageEstimate::zero()
            }
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
