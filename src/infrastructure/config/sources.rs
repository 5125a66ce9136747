//! Price source configuration.
//!
//! Each `[[sources]]` entry is tagged by `kind`:
//!
//! ```toml
//! [[sources]]
//! kind = "http"
//! name = "grey-market"
//! url = "https://feeds.example.com/grey.json"
//! store = "grey"
//!
//! [[sources]]
//! kind = "file"
//! name = "fixtures"
//! path = "data/offers.json"
//! store = "rsi"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::source::feed::FeedSettings;
use crate::domain::Store;

/// HTTP behaviour of a feed source.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSourceSettings {
    pub name: String,
    pub url: String,
    pub store: Store,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_retry_max_attempts() -> u32 {
    3
}

const fn default_retry_backoff_ms() -> u64 {
    500
}

impl HttpSourceSettings {
    #[must_use]
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            timeout: Duration::from_millis(self.timeout_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            retry_max_attempts: self.retry_max_attempts,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            ..FeedSettings::default()
        }
    }
}

/// A feed-format JSON file read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct FileSourceSettings {
    pub name: String,
    pub path: PathBuf,
    pub store: Store,
}

/// One configured price source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSettings {
    Http(HttpSourceSettings),
    File(FileSourceSettings),
}

impl SourceSettings {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Http(http) => &http.name,
            Self::File(file) => &file.name,
        }
    }
}
