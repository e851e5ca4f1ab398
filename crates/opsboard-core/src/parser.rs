//! Log line parser
//!
//! The agent writes plain text lines of the form
//!
//! ```text
//! 2025-03-14 06:00:02 - AI news briefing completed
//! ```
//!
//! Anything else is still accepted and degrades to an `info` entry stamped
//! with the parse time. This module is the only place that knows the line
//! format.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use regex::Regex;

use crate::models::{LogEntry, Severity};

static STAMPED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+-\s+(.+)$")
        .expect("valid regex literal")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse one line using the current wall clock for unstamped lines
pub fn parse_line(raw: &str) -> LogEntry {
    parse_line_at(raw, Local::now())
}

/// Parse one line, using `now` for lines without a timestamp.
///
/// Never fails.
pub fn parse_line_at(raw: &str, now: DateTime<Local>) -> LogEntry {
    if let Some(caps) = STAMPED_LINE.captures(raw) {
        let stamp = &caps[1];
        let message = &caps[2];
        let recorded_at = parse_timestamp(stamp).unwrap_or_else(|| {
            tracing::trace!(stamp, "Timestamp is not a calendar time, using parse time");
            now
        });
        return LogEntry::new(stamp, recorded_at, Severity::classify(message), message);
    }

    LogEntry::new(
        now.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
        now,
        Severity::Info,
        raw,
    )
}

/// Parse file content, keeping only the last `limit` non-empty lines.
///
/// All unstamped lines in one call share the same `now`.
pub fn parse_content(content: &str, limit: usize) -> Vec<LogEntry> {
    let now = Local::now();
    let lines: Vec<&str> = content
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(limit);

    lines[start..]
        .iter()
        .map(|line| parse_line_at(line, now))
        .collect()
}

/// Interpret a captured stamp as local wall-clock time
fn parse_timestamp(stamp: &str) -> Option<DateTime<Local>> {
    // The pattern allows any whitespace run between date and time
    let normalized = stamp.split_whitespace().collect::<Vec<_>>().join(" ");
    let naive = NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT).ok()?;
    Some(
        naive
            .and_local_timezone(Local)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&naive)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stamped_line() {
        let entry = parse_line("2025-03-14 06:00:02 - AI news briefing completed");
        assert_eq!(entry.timestamp, "2025-03-14 06:00:02");
        assert_eq!(entry.message, "AI news briefing completed");
        assert_eq!(entry.severity, Severity::Success);
        assert_eq!(entry.recorded_at.year(), 2025);
        assert_eq!(entry.recorded_at.hour(), 6);
        assert_eq!(entry.recorded_at.second(), 2);
    }

    #[test]
    fn test_timestamp_kept_verbatim() {
        let entry = parse_line("2025-03-14   06:00:02   -   spaced out");
        assert_eq!(entry.timestamp, "2025-03-14   06:00:02");
        assert_eq!(entry.message, "spaced out");
        assert_eq!(entry.recorded_at.minute(), 0);
    }

    #[test]
    fn test_unstamped_line_uses_now() {
        let now = Local::now();
        let raw = "Traceback (most recent call last): error in module";
        let entry = parse_line_at(raw, now);

        assert_eq!(entry.message, raw);
        assert_eq!(entry.recorded_at, now);
        // Unstamped lines are never classified
        assert_eq!(entry.severity, Severity::Info);
        assert!(entry.is_error());
    }

    #[test]
    fn test_unstamped_line_close_to_wall_clock() {
        let before = Local::now();
        let entry = parse_line("no stamp here");
        let after = Local::now();
        assert!(entry.recorded_at >= before && entry.recorded_at <= after);
        assert!(DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }

    #[test]
    fn test_unstamped_timestamp_is_utc() {
        let now = Local.with_ymd_and_hms(2025, 7, 1, 9, 30, 15).unwrap();
        let entry = parse_line_at("no stamp here", now);

        let expected = now
            .with_timezone(&Utc)
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
        assert_eq!(entry.timestamp, expected);
        assert!(entry.timestamp.ends_with(".000Z"));
    }

    #[test]
    fn test_error_beats_success() {
        let entry = parse_line("2025-03-14 06:00:02 - success flag lost: ERROR 42");
        assert_eq!(entry.severity, Severity::Error);
    }

    #[test]
    fn test_missing_separator_is_unstamped() {
        let entry = parse_line("2025-03-14 06:00:02 warn without dash");
        assert_eq!(entry.severity, Severity::Info);
        assert_eq!(entry.message, "2025-03-14 06:00:02 warn without dash");
    }

    #[test]
    fn test_invalid_calendar_date_keeps_text() {
        let now = Local::now();
        let entry = parse_line_at("2025-13-45 25:61:00 - bogus", now);
        assert_eq!(entry.timestamp, "2025-13-45 25:61:00");
        assert_eq!(entry.message, "bogus");
        assert_eq!(entry.recorded_at, now);
    }

    #[test]
    fn test_parse_content_tail_and_blank_lines() {
        let content = "2025-01-01 00:00:01 - one\r\n\n2025-01-01 00:00:02 - two\n\
                       2025-01-01 00:00:03 - three\n";
        let entries = parse_content(content, 2);
        let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);

        assert_eq!(parse_content(content, 10).len(), 3);
        assert!(parse_content("\n\n", 10).is_empty());
    }
}
