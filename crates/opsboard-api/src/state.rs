//! Application state for the status API

use std::sync::Arc;

use opsboard_core::LogSource;
use opsboard_fleet::SummaryComposer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    composer: Arc<SummaryComposer>,
}

impl AppState {
    /// Create state around a configured composer
    pub fn new(composer: SummaryComposer) -> Self {
        Self {
            composer: Arc::new(composer),
        }
    }

    /// Create state from a log source with default composer settings
    pub fn from_source(source: Arc<dyn LogSource>) -> Self {
        Self::new(SummaryComposer::new(source))
    }

    /// Get the summary composer
    pub fn composer(&self) -> &SummaryComposer {
        &self.composer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsboard_sources::MockLogSource;

    #[test]
    fn test_from_source_defaults() {
        let state = AppState::from_source(Arc::new(MockLogSource::unavailable()));
        assert_eq!(state.composer().gateway_source(), "gateway-cleaner.log");
        assert!(!tokio_test::block_on(state.composer().is_available()));
    }
}
