//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file; secrets such as
//! `DISCORD_BOT_TOKEN` come from the environment only.
//!
//! # Example
//!
//! ```no_run
//! use hangar::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use super::aggregator::AggregatorSettings;
use super::alerts::AlertSettings;
use super::cache::CacheSettings;
use super::discord::DiscordSettings;
use super::logging::LoggingConfig;
use super::search::SearchSettings;
use super::sources::SourceSettings;
use crate::error::{ConfigError, Result};

/// Deepest search accepted from configuration or the command line.
pub const MAX_SEARCH_STEPS: usize = 6;

/// Main application configuration.
///
/// Every section is optional. Load from a TOML file using [`Config::load`]
/// or parse directly with [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cache tiers and per-namespace TTLs.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Price refresh behaviour.
    #[serde(default)]
    pub aggregator: AggregatorSettings,

    /// Search depth and ranking weights.
    #[serde(default)]
    pub search: SearchSettings,

    /// Alert storage, limits and scheduling.
    #[serde(default)]
    pub alerts: AlertSettings,

    /// Discord delivery.
    #[serde(default)]
    pub discord: DiscordSettings,

    /// Price sources, queried in order. Later sources win on conflicts.
    #[serde(default)]
    pub sources: Vec<SourceSettings>,

    /// JSON ship catalog. Without one, ships are known only by the names
    /// that appear in source data.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.cache.max_memory_items == 0 {
            return Err(invalid("max_memory_items", "must be greater than 0"));
        }
        if self.cache.prices_ttl_secs == 0
            || self.cache.catalog_ttl_secs == 0
            || self.cache.search_ttl_secs == 0
        {
            return Err(invalid("cache_ttl", "TTLs must be greater than 0"));
        }
        if self.aggregator.refresh_interval_secs == 0 {
            return Err(invalid("refresh_interval_secs", "must be greater than 0"));
        }

        if self.search.max_steps == 0 || self.search.max_steps > MAX_SEARCH_STEPS {
            return Err(ConfigError::InvalidValue {
                field: "max_steps",
                reason: format!("must be between 1 and {MAX_SEARCH_STEPS}"),
            }
            .into());
        }
        if self.search.max_results == 0 {
            return Err(invalid("max_results", "must be greater than 0"));
        }
        let weights = [
            self.search.cost_weight,
            self.search.step_weight,
            self.search.risk_weight,
            self.search.step_penalty,
            self.search.risk_scale,
            self.search.unofficial_store_risk,
            self.search.limited_risk,
            self.search.out_of_stock_risk,
        ];
        if weights.iter().any(|w| *w < Decimal::ZERO) {
            return Err(invalid("search_weights", "weights must be 0 or greater"));
        }

        if self.alerts.max_active_per_owner == 0 {
            return Err(invalid("max_active_per_owner", "must be greater than 0"));
        }
        if self.alerts.check_interval_secs == 0 || self.alerts.sweep_interval_secs == 0 {
            return Err(invalid("alert_intervals", "intervals must be greater than 0"));
        }
        if self.alerts.persist && self.alerts.store_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField { field: "store_path" }.into());
        }

        if self.discord.enabled && self.discord.api_base.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_base" }.into());
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            let name = source.name().trim();
            if name.is_empty() {
                return Err(ConfigError::MissingField { field: "sources.name" }.into());
            }
            if !names.insert(name.to_string()) {
                return Err(ConfigError::InvalidValue {
                    field: "sources.name",
                    reason: format!("duplicate source name '{name}'"),
                }
                .into());
            }
            if let SourceSettings::Http(http) = source {
                if !(http.url.starts_with("http://") || http.url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        field: "sources.url",
                        reason: format!("'{}' is not an http(s) URL", http.url),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Store;
    use crate::error::Error;
    use crate::infrastructure::config::logging::LogFormat;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cache.max_memory_items, 1000);
        assert_eq!(config.cache.prices_ttl_secs, 1800);
        assert_eq!(config.aggregator.refresh_interval_secs, 1800);
        assert_eq!(config.search.max_steps, 3);
        assert_eq!(config.alerts.max_active_per_owner, 10);
        assert_eq!(config.alerts.throttle_ms, 2000);
        assert!(config.sources.is_empty());
        assert!(config.catalog.is_none());
    }

    #[test]
    fn parses_full_config() {
        let toml = r#"
            catalog = "data/ships.json"

            [logging]
            level = "debug"
            format = "json"

            [cache]
            persist = false
            search_ttl_secs = 60

            [search]
            max_steps = 4
            step_weight = "0.5"

            [alerts]
            persist = false
            max_active_per_owner = 3

            [[sources]]
            kind = "http"
            name = "grey"
            url = "https://feeds.example.com/grey.json"
            store = "grey"
            retry_max_attempts = 5

            [[sources]]
            kind = "file"
            name = "fixtures"
            path = "data/offers.json"
            store = "rsi"
        "#;

        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.cache.resolved_directory().is_none());
        assert_eq!(config.search.max_steps, 4);
        assert_eq!(config.search.step_weight, Decimal::new(5, 1));
        assert_eq!(config.alerts.max_active_per_owner, 3);
        assert_eq!(config.sources.len(), 2);
        match &config.sources[0] {
            SourceSettings::Http(http) => {
                assert_eq!(http.store, Store::Grey);
                assert_eq!(http.retry_max_attempts, 5);
                assert_eq!(http.timeout_ms, 10_000);
            }
            other => panic!("expected http source, got {other:?}"),
        }
        assert!(matches!(
            &config.sources[1],
            SourceSettings::File(file) if file.store == Store::Rsi
        ));
    }

    #[test]
    fn rejects_out_of_range_depth() {
        let err = Config::parse_toml("[search]\nmax_steps = 0").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "max_steps", .. })
        ));
        assert!(Config::parse_toml("[search]\nmax_steps = 7").is_err());
    }

    #[test]
    fn rejects_duplicate_source_names() {
        let toml = r#"
            [[sources]]
            kind = "file"
            name = "a"
            path = "x.json"
            store = "rsi"

            [[sources]]
            kind = "file"
            name = "a"
            path = "y.json"
            store = "grey"
        "#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "sources.name", .. })
        ));
    }

    #[test]
    fn rejects_non_http_feed_url() {
        let toml = r#"
            [[sources]]
            kind = "http"
            name = "bad"
            url = "ftp://feeds.example.com"
            store = "grey"
        "#;
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn rejects_zero_intervals() {
        assert!(Config::parse_toml("[alerts]\ncheck_interval_secs = 0").is_err());
        assert!(Config::parse_toml("[cache]\nmax_memory_items = 0").is_err());
        assert!(Config::parse_toml("[aggregator]\nrefresh_interval_secs = 0").is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::parse_toml("[cache\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
