//! LogSource trait - the storage abstraction behind every aggregation

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::models::{LogEntry, LogFileInfo};
use crate::parser;

/// File suffix that marks a log source
pub const LOG_SUFFIX: &str = ".log";

/// Read-only access to a directory of agent log files.
///
/// Two implementations exist:
/// - `LocalLogSource` - reads the real log directory
/// - `MockLogSource` - serves canned logs for hosted/demo deployments
///
/// Aggregation code is written against this trait only, so the operating
/// mode is decided once when the source is constructed.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Where the logs live (directory path, or a label for mock sources)
    fn location(&self) -> &str;

    /// Whether the log storage exists at all
    async fn is_available(&self) -> bool;

    /// Names of all `.log` sources, sorted by name
    async fn list_sources(&self) -> SourceResult<Vec<String>>;

    /// Whether a `.log` source with this name exists in the storage
    async fn contains(&self, source_id: &str) -> SourceResult<bool>;

    /// Full text content of one source
    async fn read_raw(&self, source_id: &str) -> SourceResult<String>;

    /// Size and modification time of every `.log` source
    async fn list_files(&self) -> SourceResult<Vec<LogFileInfo>>;

    /// Parse the last `limit` non-empty lines of one source
    async fn read_tail(&self, source_id: &str, limit: usize) -> SourceResult<Vec<LogEntry>> {
        let content = self.read_raw(source_id).await?;
        Ok(parser::parse_content(&content, limit))
    }
}

/// Whether a file name denotes a log source
pub fn is_log_source(name: &str) -> bool {
    name.ends_with(LOG_SUFFIX)
}

/// Whether a requested name stays inside the log storage
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_log_source() {
        assert!(is_log_source("gateway-cleaner.log"));
        assert!(!is_log_source("notes.txt"));
        assert!(!is_log_source("cron.log.1"));
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("ai_news.log"));
        assert!(!is_plain_file_name("../etc/passwd"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b.log"));
        assert!(!is_plain_file_name(""));
    }
}
