//! Mock [`PriceSource`] implementations for testing.
//!
//! - [`ScriptedSource`]: fixed listings and offers, with a call counter.
//! - [`FailingSource`]: every fetch fails as unreachable.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{PriceListing, UpgradeEdge};
use crate::error::SourceError;
use crate::port::outbound::source::PriceSource;

/// A source returning whatever it was loaded with.
///
/// Contents can be replaced between fetches with [`ScriptedSource::replace`].
pub struct ScriptedSource {
    name: String,
    listings: Mutex<Vec<PriceListing>>,
    edges: Mutex<Vec<UpgradeEdge>>,
    fetch_count: Arc<AtomicU32>,
}

impl ScriptedSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            listings: Mutex::new(Vec::new()),
            edges: Mutex::new(Vec::new()),
            fetch_count: Arc::new(AtomicU32::new(0)),
        }
    }

    #[must_use]
    pub fn with_listings(self, listings: Vec<PriceListing>) -> Self {
        *self.listings.lock() = listings;
        self
    }

    #[must_use]
    pub fn with_edges(self, edges: Vec<UpgradeEdge>) -> Self {
        *self.edges.lock() = edges;
        self
    }

    /// Replace the offers returned by later fetches.
    pub fn replace(&self, edges: Vec<UpgradeEdge>) {
        *self.edges.lock() = edges;
    }

    /// Number of `fetch_upgrade_edges` calls so far.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch_listings(&self) -> Result<Vec<PriceListing>, SourceError> {
        Ok(self.listings.lock().clone())
    }

    async fn fetch_upgrade_edges(&self) -> Result<Vec<UpgradeEdge>, SourceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.edges.lock().clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A source that is never reachable.
pub struct FailingSource {
    name: String,
}

impl FailingSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn unavailable(&self) -> SourceError {
        SourceError::Unavailable {
            source_name: self.name.clone(),
            reason: "connection refused".into(),
        }
    }
}

#[async_trait]
impl PriceSource for FailingSource {
    async fn fetch_listings(&self) -> Result<Vec<PriceListing>, SourceError> {
        Err(self.unavailable())
    }

    async fn fetch_upgrade_edges(&self) -> Result<Vec<UpgradeEdge>, SourceError> {
        Err(self.unavailable())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
