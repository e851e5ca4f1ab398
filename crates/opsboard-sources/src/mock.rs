//! Mock log source for hosted deployments and tests
//!
//! Serves in-memory log files instead of touching the filesystem. The demo
//! data set is stamped relative to the moment it is built and then never
//! changes, so repeated snapshots are identical.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use opsboard_core::{
    is_log_source, LogFileInfo, LogSource, SourceError, SourceResult,
};
use parking_lot::RwLock;

/// Label reported as the location of mock sources
pub const MOCK_LOCATION: &str = "mock://opsboard";

#[derive(Debug, Clone)]
struct MockFile {
    content: String,
    modified: DateTime<Utc>,
}

/// In-memory log source
pub struct MockLogSource {
    available: bool,
    files: RwLock<BTreeMap<String, MockFile>>,
    /// Files that are listed but fail to read
    unreadable: RwLock<BTreeSet<String>>,
}

impl MockLogSource {
    /// Empty, available source
    pub fn new() -> Self {
        Self {
            available: true,
            files: RwLock::new(BTreeMap::new()),
            unreadable: RwLock::new(BTreeSet::new()),
        }
    }

    /// Source that reports its storage as missing
    pub fn unavailable() -> Self {
        Self {
            available: false,
            files: RwLock::new(BTreeMap::new()),
            unreadable: RwLock::new(BTreeSet::new()),
        }
    }

    /// Add or replace a file
    pub fn add_file(&self, name: impl Into<String>, content: impl Into<String>) {
        self.add_file_modified_at(name, content, Utc::now());
    }

    /// Add or replace a file with an explicit modification time
    pub fn add_file_modified_at(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
        modified: DateTime<Utc>,
    ) {
        self.files.write().insert(
            name.into(),
            MockFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Make reads of an existing file fail with an I/O error
    pub fn fail_reads(&self, name: impl Into<String>) {
        self.unreadable.write().insert(name.into());
    }

    /// Canned logs resembling a healthy agent with one noisy job
    pub fn demo() -> Self {
        let source = Self::new();
        let anchor = Local::now();
        let stamp = |minutes_ago: i64| {
            (anchor - Duration::minutes(minutes_ago))
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        };
        let modified = |minutes_ago: i64| (anchor - Duration::minutes(minutes_ago)).with_timezone(&Utc);

        let gateway: String = (0..12)
            .rev()
            .map(|i| {
                let message = if i == 7 {
                    "Warning: gateway restart took 14s"
                } else {
                    "Gateway is healthy"
                };
                format!("{} - {}\n", stamp(i * 5), message)
            })
            .collect();
        source.add_file_modified_at("gateway-cleaner.log", gateway, modified(0));

        source.add_file_modified_at(
            "ai_news_briefing.log",
            format!(
                "{} - Collecting headlines\n{} - Briefing sent successfully\n",
                stamp(185),
                stamp(180)
            ),
            modified(180),
        );

        source.add_file_modified_at(
            "ai_lesson.log",
            format!(
                "{} - Generating one-minute lesson\n{} - Lesson published, task completed\n",
                stamp(62),
                stamp(60)
            ),
            modified(60),
        );

        let publisher: String = (0..8)
            .rev()
            .map(|i| {
                format!(
                    "{} - Error: upload rejected (attempt {})\n",
                    stamp(30 + i),
                    8 - i
                )
            })
            .collect();
        source.add_file_modified_at("content_publisher.log", publisher, modified(30));

        source.add_file_modified_at(
            "family_companion.log",
            format!(
                "{} - Drafting weekly family digest\n{} - Digest completed\n",
                stamp(1450),
                stamp(1440)
            ),
            modified(1440),
        );

        source
    }
}

impl Default for MockLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    fn location(&self) -> &str {
        MOCK_LOCATION
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn list_sources(&self) -> SourceResult<Vec<String>> {
        if !self.available {
            return Err(SourceError::Unavailable(MOCK_LOCATION.to_string()));
        }
        // BTreeMap keys are already sorted
        Ok(self
            .files
            .read()
            .keys()
            .filter(|name| is_log_source(name))
            .cloned()
            .collect())
    }

    async fn contains(&self, source_id: &str) -> SourceResult<bool> {
        Ok(self.available
            && is_log_source(source_id)
            && self.files.read().contains_key(source_id))
    }

    async fn read_raw(&self, source_id: &str) -> SourceResult<String> {
        if self.unreadable.read().contains(source_id) {
            return Err(SourceError::io(
                source_id,
                std::io::Error::other("simulated read failure"),
            ));
        }
        self.files
            .read()
            .get(source_id)
            .filter(|_| self.available)
            .map(|f| f.content.clone())
            .ok_or_else(|| SourceError::NotFound(source_id.to_string()))
    }

    async fn list_files(&self) -> SourceResult<Vec<LogFileInfo>> {
        let mut files: Vec<LogFileInfo> = self
            .files
            .read()
            .iter()
            .filter(|(name, _)| is_log_source(name))
            .map(|(name, file)| LogFileInfo {
                name: name.clone(),
                size: file.content.len() as u64,
                modified: file.modified,
            })
            .collect();

        files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        Ok(files)
    }
}
