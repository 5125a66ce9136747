//! Cache entries and namespaces.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Class of cached data. Each namespace carries its own TTL and
/// persistence policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Aggregated price indices. Volatile.
    Prices,
    /// Ship catalog data. Near-static.
    Catalog,
    /// Interactive search results.
    Search,
}

impl Namespace {
    /// All namespaces.
    pub const ALL: [Namespace; 3] = [Self::Prices, Self::Catalog, Self::Search];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prices => "prices",
            Self::Catalog => "catalog",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content hash addressing an entry in both tiers.
#[must_use]
pub fn content_key(namespace: Namespace, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// A cached JSON payload with its write time and TTL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub namespace: Namespace,
    pub payload: serde_json::Value,
    pub written_at: DateTime<Utc>,
    pub ttl_ms: i64,
}

impl CacheEntry {
    pub fn new(
        namespace: Namespace,
        key: impl Into<String>,
        payload: serde_json::Value,
        written_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            namespace,
            payload,
            written_at,
            ttl_ms: ttl.num_milliseconds(),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::milliseconds(self.ttl_ms)
    }

    /// Expired once strictly more than `ttl` has elapsed since the write.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.written_at > self.ttl()
    }
}
