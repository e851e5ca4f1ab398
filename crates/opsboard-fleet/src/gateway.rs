//! Gateway health inference
//!
//! The agent's gateway watchdog writes a "Gateway is healthy" line on every
//! successful check. The gateway is considered online when such a line shows
//! up among the last few entries of the watchdog log.

use opsboard_core::{
    GatewayState, GatewayStatus, LogEntry, LogSource, Severity, SourceError, SourceResult,
};
use tracing::{debug, warn};

/// Log written by the gateway watchdog
pub const DEFAULT_GATEWAY_SOURCE: &str = "gateway-cleaner.log";

/// Entries read from the gateway log
pub const GATEWAY_READ_LIMIT: usize = 50;

/// Most recent entries inspected for health markers
pub const GATEWAY_WINDOW: usize = 10;

/// Maximum number of error messages reported
pub const GATEWAY_MAX_ERRORS: usize = 5;

const HEALTHY_MARKER: &str = "gateway is healthy";

/// Infer gateway status. `None` means the gateway log does not exist.
pub fn infer_gateway(entries: Option<&[LogEntry]>) -> GatewayStatus {
    let Some(entries) = entries else {
        return GatewayStatus::unknown();
    };

    let window = &entries[entries.len().saturating_sub(GATEWAY_WINDOW)..];

    let healthy = window
        .iter()
        .any(|e| e.message.to_lowercase().contains(HEALTHY_MARKER));

    let flagged: Vec<String> = window
        .iter()
        .filter(|e| e.severity == Severity::Error || e.message.to_lowercase().contains("warning"))
        .map(|e| e.message.clone())
        .collect();
    let errors = flagged[flagged.len().saturating_sub(GATEWAY_MAX_ERRORS)..].to_vec();

    GatewayStatus {
        status: if healthy {
            GatewayState::Online
        } else {
            GatewayState::Offline
        },
        last_checked: window.last().map(|e| e.timestamp.clone()),
        uptime: healthy.then(|| "running".to_string()),
        errors,
    }
}

/// Read the designated gateway log and infer its status.
///
/// A missing log yields `unknown` and an unreadable one yields `offline`.
/// Only a failure of the storage itself is returned.
pub async fn gateway_status(
    source: &dyn LogSource,
    gateway_source: &str,
) -> SourceResult<GatewayStatus> {
    let read = match source.contains(gateway_source).await {
        Ok(false) => {
            debug!(source = %gateway_source, "Gateway log not present");
            return Ok(infer_gateway(None));
        }
        Ok(true) => source.read_tail(gateway_source, GATEWAY_READ_LIMIT).await,
        Err(e) => Err(e),
    };

    match read {
        Ok(entries) => Ok(infer_gateway(Some(entries.as_slice()))),
        // Removed between the existence check and the read
        Err(SourceError::NotFound(_)) => Ok(infer_gateway(None)),
        Err(e @ SourceError::Unavailable(_)) => Err(e),
        Err(e) => {
            warn!(
                source = %gateway_source,
                error = %e,
                "Gateway log unreadable, reporting offline"
            );
            Ok(infer_gateway(Some(&[])))
        }
    }
}
