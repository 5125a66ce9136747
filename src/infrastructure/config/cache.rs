//! Cache configuration.

use std::path::PathBuf;

use chrono::Duration;
use serde::Deserialize;

use crate::application::cache::service::{CacheConfig, NamespacePolicy};

/// `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Disk tier directory. Defaults to the platform cache dir; set
    /// `persist = false` to keep everything in memory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_persist")]
    pub persist: bool,
    #[serde(default = "default_max_memory_items")]
    pub max_memory_items: usize,
    #[serde(default = "default_prices_ttl_secs")]
    pub prices_ttl_secs: u64,
    #[serde(default = "default_catalog_ttl_secs")]
    pub catalog_ttl_secs: u64,
    #[serde(default = "default_search_ttl_secs")]
    pub search_ttl_secs: u64,
}

const fn default_persist() -> bool {
    true
}

const fn default_max_memory_items() -> usize {
    1000
}

const fn default_prices_ttl_secs() -> u64 {
    30 * 60
}

const fn default_catalog_ttl_secs() -> u64 {
    24 * 60 * 60
}

const fn default_search_ttl_secs() -> u64 {
    5 * 60
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            directory: None,
            persist: default_persist(),
            max_memory_items: default_max_memory_items(),
            prices_ttl_secs: default_prices_ttl_secs(),
            catalog_ttl_secs: default_catalog_ttl_secs(),
            search_ttl_secs: default_search_ttl_secs(),
        }
    }
}

impl CacheSettings {
    /// Effective disk tier directory, if any.
    #[must_use]
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        if !self.persist {
            return None;
        }
        self.directory
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("hangar")))
    }

    /// Convert to the cache service configuration.
    #[must_use]
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_memory_items: self.max_memory_items,
            directory: self.resolved_directory(),
            prices: NamespacePolicy {
                ttl: secs(self.prices_ttl_secs),
                persisted: true,
            },
            catalog: NamespacePolicy {
                ttl: secs(self.catalog_ttl_secs),
                persisted: true,
            },
            search: NamespacePolicy {
                ttl: secs(self.search_ttl_secs),
                persisted: false,
            },
        }
    }
}

/// Seconds as a `chrono::Duration`, saturating at the largest
/// representable span.
pub(super) fn secs(value: u64) -> Duration {
    const MAX_SECS: i64 = i64::MAX / 1000;
    Duration::seconds(i64::try_from(value).unwrap_or(MAX_SECS).min(MAX_SECS))
}
