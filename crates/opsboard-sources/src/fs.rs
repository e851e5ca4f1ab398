//! Filesystem log source
//!
//! Reads the agent's log directory directly. Every file operation runs under
//! a per-file timeout so a hung mount cannot stall a whole snapshot.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opsboard_core::{
    is_log_source, is_plain_file_name, LogFileInfo, LogSource, SourceError, SourceResult,
};
use tracing::{debug, warn};

/// Default per-file read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Log source backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalLogSource {
    dir: PathBuf,
    location: String,
    read_timeout: Duration,
}

impl LocalLogSource {
    /// Create a source for the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let location = dir.display().to_string();
        Self {
            dir,
            location,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Override the per-file read timeout
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Directory being read
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, source_id: &str) -> SourceResult<PathBuf> {
        if !is_plain_file_name(source_id) {
            return Err(SourceError::NotFound(source_id.to_string()));
        }
        Ok(self.dir.join(source_id))
    }

    async fn timed<T, F>(&self, source_id: &str, op: F) -> SourceResult<T>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        match tokio::time::timeout(self.read_timeout, op).await {
            Ok(result) => result.map_err(|e| SourceError::io(source_id, e)),
            Err(_) => Err(SourceError::Timeout(source_id.to_string())),
        }
    }

    async fn file_info(&self, name: String) -> SourceResult<LogFileInfo> {
        let path = self.path_for(&name)?;
        let meta = self.timed(&name, tokio::fs::metadata(&path)).await?;
        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|e| SourceError::io(&name, e))?;

        Ok(LogFileInfo {
            name,
            size: meta.len(),
            modified,
        })
    }
}

#[async_trait]
impl LogSource for LocalLogSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn is_available(&self) -> bool {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                debug!(dir = %self.location, error = %e, "Log directory not readable");
                false
            }
        }
    }

    async fn list_sources(&self) -> SourceResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", self.location, e)))?;

        let mut names = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    return Err(SourceError::Unavailable(format!(
                        "{}: {}",
                        self.location, e
                    )))
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_log_source(&name) {
                continue;
            }
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            names.push(name);
        }

        names.sort();
        debug!(dir = %self.location, count = names.len(), "Discovered log sources");
        Ok(names)
    }

    async fn contains(&self, source_id: &str) -> SourceResult<bool> {
        if !is_log_source(source_id) {
            return Ok(false);
        }
        let path = match self.path_for(source_id) {
            Ok(path) => path,
            Err(_) => return Ok(false),
        };

        match self.timed(source_id, tokio::fs::metadata(&path)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(SourceError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn read_raw(&self, source_id: &str) -> SourceResult<String> {
        let path = self.path_for(source_id)?;
        let bytes = self.timed(source_id, tokio::fs::read(&path)).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn list_files(&self) -> SourceResult<Vec<LogFileInfo>> {
        let mut files = Vec::new();
        for name in self.list_sources().await? {
            match self.file_info(name.clone()).await {
                Ok(info) => files.push(info),
                Err(e) => {
                    warn!(source = %name, error = %e, "Skipping log file metadata");
                }
            }
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        Ok(files)
    }
}
