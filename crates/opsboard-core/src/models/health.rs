//! Gateway health and usage estimate models

use serde::{Deserialize, Serialize};

/// Binary reachability of the agent's gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayState {
    Online,
    Offline,
    /// Designated gateway log is absent
    #[default]
    Unknown,
}

/// Gateway health inferred from its log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatus {
    pub status: GatewayState,
    /// Timestamp text of the newest inspected entry
    pub last_checked: Option<String>,
    /// `"running"` when online; not a measured duration
    pub uptime: Option<String>,
    /// Most recent error/warning messages (at most 5)
    pub errors: Vec<String>,
}

impl GatewayStatus {
    /// Status reported when the gateway log does not exist
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Heuristic usage estimate derived from log volume.
///
/// This is an estimate, not metered usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEstimate {
    pub estimated_tokens: u64,
    pub estimated_cost: f64,
    pub last24h_calls: u64,
    /// Timestamp text of the oldest entry counted in the window
    pub last_reset: Option<String>,
}

impl UsageEstimate {
    /// Zero-valued estimate
    pub fn zero() -> Self {
        Self::default()
    }
}
