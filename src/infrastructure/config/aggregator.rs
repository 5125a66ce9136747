//! Price aggregation configuration.

use serde::Deserialize;

use super::cache::secs;
use crate::application::aggregator::AggregatorConfig;

/// `[aggregator]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorSettings {
    /// Minimum index age before sources are queried again.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Price samples kept per ship and store.
    #[serde(default = "default_history_len")]
    pub history_len: usize,
}

const fn default_refresh_interval_secs() -> u64 {
    30 * 60
}

const fn default_history_len() -> usize {
    48
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            history_len: default_history_len(),
        }
    }
}

impl From<&AggregatorSettings> for AggregatorConfig {
    fn from(settings: &AggregatorSettings) -> Self {
        Self {
            refresh_interval: secs(settings.refresh_interval_secs),
            history_len: settings.history_len,
        }
    }
}
