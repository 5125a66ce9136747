//! In-memory tier with least-recently-used eviction.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::entry::{CacheEntry, Namespace};

struct Slot {
    entry: CacheEntry,
    stamp: u64,
}

/// Bounded map of entries keyed by content hash.
///
/// `recency` orders hashes by last access stamp; the smallest stamp is the
/// next eviction victim. Not synchronized: the owning cache wraps it in a
/// mutex.
pub(crate) struct MemoryTier {
    capacity: usize,
    entries: HashMap<String, Slot>,
    recency: BTreeMap<u64, String>,
    clock: u64,
}

impl MemoryTier {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            clock: 0,
        }
    }

    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Look up an entry and mark it most recently used.
    pub(crate) fn get(&mut self, hash: &str) -> Option<CacheEntry> {
        let stamp = self.next_stamp();
        let slot = self.entries.get_mut(hash)?;
        self.recency.remove(&slot.stamp);
        slot.stamp = stamp;
        self.recency.insert(stamp, hash.to_string());
        Some(slot.entry.clone())
    }

    /// Insert or replace, evicting least recently used entries over capacity.
    pub(crate) fn insert(&mut self, hash: String, entry: CacheEntry) {
        let stamp = self.next_stamp();
        if let Some(old) = self.entries.insert(hash.clone(), Slot { entry, stamp }) {
            self.recency.remove(&old.stamp);
        }
        self.recency.insert(stamp, hash);

        while self.entries.len() > self.capacity {
            let Some((_, victim)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&victim);
        }
    }

    pub(crate) fn remove(&mut self, hash: &str) -> bool {
        match self.entries.remove(hash) {
            Some(slot) => {
                self.recency.remove(&slot.stamp);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_namespace(&mut self, namespace: Namespace) -> usize {
        self.remove_where(|entry| entry.namespace == namespace)
    }

    pub(crate) fn remove_expired(&mut self, now: DateTime<Utc>) -> usize {
        self.remove_where(|entry| entry.is_expired(now))
    }

    fn remove_where(&mut self, predicate: impl Fn(&CacheEntry) -> bool) -> usize {
        let victims: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| predicate(&slot.entry))
            .map(|(hash, _)| hash.clone())
            .collect();
        for hash in &victims {
            self.remove(hash);
        }
        victims.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(key: &str) -> CacheEntry {
        CacheEntry::new(
            Namespace::Search,
            key,
            serde_json::json!(key),
            Utc::now(),
            Duration::minutes(5),
        )
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut tier = MemoryTier::new(2);
        tier.insert("a".into(), entry("a"));
        tier.insert("b".into(), entry("b"));

        // Touch "a" so "b" becomes the eviction victim.
        assert!(tier.get("a").is_some());
        tier.insert("c".into(), entry("c"));

        assert_eq!(tier.len(), 2);
        assert!(tier.get("a").is_some());
        assert!(tier.get("b").is_none());
        assert!(tier.get("c").is_some());
    }

    #[test]
    fn reinsert_does_not_grow() {
        let mut tier = MemoryTier::new(4);
        tier.insert("a".into(), entry("a"));
        tier.insert("a".into(), entry("a"));
        assert_eq!(tier.len(), 1);
        assert_eq!(tier.recency.len(), 1);
    }

    #[test]
    fn remove_namespace_only_touches_that_namespace() {
        let mut tier = MemoryTier::new(4);
        tier.insert("a".into(), entry("a"));
        let mut other = entry("b");
        other.namespace = Namespace::Prices;
        tier.insert("b".into(), other);

        assert_eq!(tier.remove_namespace(Namespace::Search), 1);
        assert!(tier.get("b").is_some());
    }
}
