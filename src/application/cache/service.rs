//! Namespaced TTL cache with a memory tier and an optional disk tier.
//!
//! - The memory tier is a bounded LRU map guarded by a mutex, so
//!   concurrent readers and writers never observe a torn entry.
//! - Namespaces marked `persisted` are also written to disk, and a memory
//!   miss falls back to the disk copy.
//! - Expired entries are never returned from either tier.
//! - Disk failures are logged and treated as misses.
//!
//! There is no single-flight: concurrent [`Cache::get_or_set`] calls for
//! the same key may each run their factory.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::disk::DiskTier;
use super::entry::{content_key, CacheEntry, Namespace};
use super::memory::MemoryTier;
use crate::error::CacheError;
use crate::port::outbound::clock::Clock;

/// TTL and persistence for one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespacePolicy {
    pub ttl: Duration,
    pub persisted: bool,
}

/// Cache construction parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum entries held in memory before LRU eviction.
    pub max_memory_items: usize,
    /// Root of the disk tier. `None` disables it entirely.
    pub directory: Option<PathBuf>,
    pub prices: NamespacePolicy,
    pub catalog: NamespacePolicy,
    pub search: NamespacePolicy,
}

impl CacheConfig {
    #[must_use]
    pub fn policy(&self, namespace: Namespace) -> NamespacePolicy {
        match namespace {
            Namespace::Prices => self.prices,
            Namespace::Catalog => self.catalog,
            Namespace::Search => self.search,
        }
    }

    /// Default policies without a disk tier.
    #[must_use]
    pub fn memory_only() -> Self {
        Self {
            directory: None,
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_memory_items: 1000,
            directory: None,
            prices: NamespacePolicy {
                ttl: Duration::minutes(30),
                persisted: true,
            },
            catalog: NamespacePolicy {
                ttl: Duration::hours(24),
                persisted: true,
            },
            search: NamespacePolicy {
                ttl: Duration::minutes(5),
                persisted: false,
            },
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// The cache service. Construct once and share behind an `Arc`.
pub struct Cache {
    config: CacheConfig,
    memory: Mutex<MemoryTier>,
    disk: Option<DiskTier>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Cache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let disk = config.directory.clone().map(DiskTier::new);
        Self {
            memory: Mutex::new(MemoryTier::new(config.max_memory_items)),
            disk,
            config,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Root directory of the disk tier, if enabled.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.disk.as_ref().map(DiskTier::root)
    }

    /// Default TTL of a namespace.
    #[must_use]
    pub fn ttl(&self, namespace: Namespace) -> Duration {
        self.config.policy(namespace).ttl
    }

    fn disk_for(&self, namespace: Namespace) -> Option<&DiskTier> {
        if self.config.policy(namespace).persisted {
            self.disk.as_ref()
        } else {
            None
        }
    }

    /// Get a value, checking memory first and then disk.
    pub async fn get<T: DeserializeOwned>(&self, namespace: Namespace, key: &str) -> Option<T> {
        let hash = content_key(namespace, key);
        let now = self.clock.now();

        if let Some(entry) = self.lookup(namespace, &hash, now).await {
            match serde_json::from_value(entry.payload) {
                Ok(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(value);
                }
                Err(e) => {
                    warn!(
                        namespace = %namespace,
                        key,
                        error = %e,
                        "Cached payload has unexpected shape"
                    );
                    self.memory.lock().remove(&hash);
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn lookup(
        &self,
        namespace: Namespace,
        hash: &str,
        now: DateTime<Utc>,
    ) -> Option<CacheEntry> {
        let cached = self.memory.lock().get(hash);
        if let Some(entry) = cached {
            if !entry.is_expired(now) {
                return Some(entry);
            }
            self.memory.lock().remove(hash);
        }

        let disk = self.disk_for(namespace)?;
        match disk.read(namespace, hash).await {
            Ok(Some(entry)) if !entry.is_expired(now) => {
                debug!(namespace = %namespace, key = %entry.key, "Cache disk hit");
                self.memory.lock().insert(hash.to_string(), entry.clone());
                Some(entry)
            }
            Ok(Some(_)) => {
                if let Err(e) = disk.remove(namespace, hash).await {
                    warn!(namespace = %namespace, error = %e, "Failed to purge expired cache file");
                }
                None
            }
            Ok(None) => None,
            Err(CacheError::Serialize(e)) => {
                warn!(namespace = %namespace, error = %e, "Discarding unreadable cache file");
                let _ = disk.remove(namespace, hash).await;
                None
            }
            Err(e) => {
                warn!(namespace = %namespace, error = %e, "Cache disk read failed");
                None
            }
        }
    }

    /// Store a value. `ttl` overrides the namespace default.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        namespace: Namespace,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) {
        let payload = match serde_json::to_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(namespace = %namespace, key, error = %e, "Value is not cacheable");
                return;
            }
        };
        let ttl = ttl.unwrap_or_else(|| self.ttl(namespace));
        let entry = CacheEntry::new(namespace, key, payload, self.clock.now(), ttl);
        let hash = content_key(namespace, key);

        if let Some(disk) = self.disk_for(namespace) {
            if let Err(e) = disk.write(&hash, &entry).await {
                warn!(namespace = %namespace, key, error = %e, "Cache disk write failed");
            }
        }
        self.memory.lock().insert(hash, entry);
    }

    /// Get a value, or compute, store and return it on a miss.
    ///
    /// Factory errors are returned as-is and nothing is stored.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        namespace: Namespace,
        key: &str,
        ttl: Option<Duration>,
        factory: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(namespace, key).await {
            return Ok(value);
        }
        let value = factory().await?;
        self.set(namespace, key, &value, ttl).await;
        Ok(value)
    }

    /// Remove a single key from both tiers.
    pub async fn remove(&self, namespace: Namespace, key: &str) {
        let hash = content_key(namespace, key);
        self.memory.lock().remove(&hash);
        if let Some(disk) = self.disk_for(namespace) {
            if let Err(e) = disk.remove(namespace, &hash).await {
                warn!(namespace = %namespace, key, error = %e, "Cache disk remove failed");
            }
        }
    }

    /// Drop every entry of a namespace from both tiers.
    pub async fn invalidate_namespace(&self, namespace: Namespace) {
        let removed = self.memory.lock().remove_namespace(namespace);
        if let Some(disk) = self.disk.as_ref() {
            if let Err(e) = disk.clear(namespace).await {
                warn!(namespace = %namespace, error = %e, "Cache disk clear failed");
            }
        }
        debug!(namespace = %namespace, removed, "Cache namespace invalidated");
    }

    /// Reclaim expired entries from both tiers. Returns the number removed.
    pub async fn clean_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = self.memory.lock().remove_expired(now);

        if let Some(disk) = self.disk.as_ref() {
            for namespace in Namespace::ALL {
                match disk.sweep(namespace, now).await {
                    Ok(count) => removed += count,
                    Err(e) => {
                        warn!(namespace = %namespace, error = %e, "Cache disk sweep failed");
                    }
                }
            }
        }

        if removed > 0 {
            info!(removed, "Expired cache entries cleaned");
        }
        removed
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_entries: self.memory.lock().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
