//! Parsed log line models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Coarse classification of a log line, derived from its message text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing notable
    #[default]
    Info,
    /// Message mentions a warning
    Warn,
    /// Message mentions an error
    Error,
    /// Message reports a success or completion
    Success,
}

impl Severity {
    /// Classify a message body.
    ///
    /// Case-insensitive substring match, first hit wins:
    /// `error` > `warn` > `success`/`completed` > info.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("error") {
            Severity::Error
        } else if lower.contains("warn") {
            Severity::Warn
        } else if lower.contains("success") || lower.contains("completed") {
            Severity::Success
        } else {
            Severity::Info
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Success => "success",
        };
        f.write_str(s)
    }
}

/// One parsed log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Timestamp text as it appeared in the line, or the parse time (RFC 3339)
    pub timestamp: String,
    /// Instant the timestamp denotes, in local wall-clock time
    #[serde(skip)]
    pub recorded_at: DateTime<Local>,
    /// Severity classification
    #[serde(rename = "level")]
    pub severity: Severity,
    /// Message body
    pub message: String,
}

impl LogEntry {
    /// Build an entry from already-extracted parts
    pub fn new(
        timestamp: impl Into<String>,
        recorded_at: DateTime<Local>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            recorded_at,
            severity,
            message: message.into(),
        }
    }

    /// Whether this entry counts as an error for job classification.
    ///
    /// Unstamped lines are always `info`, so the message is checked as well.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error || self.message.to_lowercase().contains("error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(Severity::classify("ERROR after success"), Severity::Error);
        assert_eq!(Severity::classify("Warning: disk at 91%"), Severity::Warn);
        assert_eq!(Severity::classify("job Completed"), Severity::Success);
        assert_eq!(Severity::classify("warn and completed"), Severity::Warn);
        assert_eq!(Severity::classify("heartbeat"), Severity::Info);
    }

    #[test]
    fn test_entry_serializes_level() {
        let entry = LogEntry::new(
            "2025-01-01 10:00:00",
            Local::now(),
            Severity::Success,
            "done",
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["timestamp"], "2025-01-01 10:00:00");
        assert!(json.get("recorded_at").is_none());
    }

    #[test]
    fn test_is_error_checks_message() {
        let entry = LogEntry::new("now", Local::now(), Severity::Info, "Error: boom");
        assert!(entry.is_error());
        let entry = LogEntry::new("now", Local::now(), Severity::Warn, "slow");
        assert!(!entry.is_error());
    }
}
