//! Common error types for log sources

use thiserror::Error;

/// Result type for log source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while reading log sources
#[derive(Debug, Error)]
pub enum SourceError {
    /// Named source (log file) does not exist
    #[error("Source not found: {0}")]
    NotFound(String),

    /// The log storage as a whole cannot be reached
    #[error("Log storage unavailable: {0}")]
    Unavailable(String),

    /// I/O failure while reading one source
    #[error("I/O error on {source_id}: {error}")]
    Io {
        /// Source (file name) being read
        source_id: String,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// Reading a source exceeded the configured per-file timeout
    #[error("Timed out reading {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SourceError {
    /// Wrap an I/O error, mapping `NotFound` onto [`SourceError::NotFound`]
    pub fn io(source_id: impl Into<String>, error: std::io::Error) -> Self {
        let source_id = source_id.into();
        if error.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(source_id)
        } else {
            SourceError::Io { source_id, error }
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            SourceError::NotFound(_) => 404,
            SourceError::Unavailable(_) => 503,
            SourceError::Io { .. } => 500,
            SourceError::Timeout(_) => 504,
            SourceError::Internal(_) => 500,
        }
    }

    /// Whether this error means the source simply is not there
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err = SourceError::io(
            "cron.log",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_io_other_keeps_context() {
        let err = SourceError::io(
            "cron.log",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("cron.log"));
    }
}
