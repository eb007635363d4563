//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::upstream::{InferenceService, WatsonClient};

/// Shared application state passed to all handlers.
pub struct AppState {
    pub config: Config,
    pub upstream: Arc<dyn InferenceService>,
}

impl AppState {
    pub fn new(config: Config, upstream: Arc<dyn InferenceService>) -> Self {
        Self { config, upstream }
    }

    /// State backed by the Watson services named in the configuration.
    pub fn from_config(config: Config) -> Self {
        let upstream = Arc::new(WatsonClient::new(&config.watson));
        Self::new(config, upstream)
    }
}
