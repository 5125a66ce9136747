//! Price aggregation across all configured sources.
//!
//! Every refresh fans out to all sources at once and waits for each to
//! settle. A failing source is logged and left out of the merge; it never
//! cancels or blocks its siblings. The merged index is cached in the
//! [`Namespace::Prices`] namespace so restarts and other consumers reuse it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cache::entry::Namespace;
use super::cache::service::Cache;
use super::history::{PriceHistory, PriceSample};
use crate::domain::{PriceIndex, PriceListing, ShipKey, UpgradeEdge};
use crate::error::{AggregateError, SourceError};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::source::PriceSource;

/// Stable cache key of the merged index.
const INDEX_KEY: &str = "price-index";

/// Aggregator tuning.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Minimum age of the current index before sources are queried again.
    pub refresh_interval: Duration,
    /// Samples kept per (ship, store) in the price history.
    pub history_len: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::minutes(30),
            history_len: 48,
        }
    }
}

/// Outcome of one source during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Fetched {
        source: String,
        listings: usize,
        edges: usize,
    },
    Failed {
        source: String,
        reason: String,
    },
}

impl SourceOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-source results of the last refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub outcomes: Vec<SourceOutcome>,
}

impl RefreshReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }
}

/// Cached form of the index, carrying when it was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedIndex {
    refreshed_at: DateTime<Utc>,
    index: PriceIndex,
}

#[derive(Default)]
struct AggregatorState {
    index: Option<Arc<PriceIndex>>,
    refreshed_at: Option<DateTime<Utc>>,
    last_report: Option<RefreshReport>,
}

struct Fetched {
    listings: Vec<PriceListing>,
    edges: Vec<UpgradeEdge>,
}

/// Builds and serves the current [`PriceIndex`].
pub struct PriceAggregator {
    sources: Vec<Arc<dyn PriceSource>>,
    cache: Arc<Cache>,
    clock: Arc<dyn Clock>,
    config: AggregatorConfig,
    state: RwLock<AggregatorState>,
    history: Mutex<PriceHistory>,
}

impl PriceAggregator {
    pub fn new(
        sources: Vec<Arc<dyn PriceSource>>,
        cache: Arc<Cache>,
        clock: Arc<dyn Clock>,
        config: AggregatorConfig,
    ) -> Self {
        let history = PriceHistory::new(config.history_len);
        Self {
            sources,
            cache,
            clock,
            config,
            state: RwLock::new(AggregatorState::default()),
            history: Mutex::new(history),
        }
    }

    /// Number of configured sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Current index: reused while younger than the refresh interval,
    /// otherwise rebuilt from the sources.
    pub async fn index(&self) -> Result<Arc<PriceIndex>, AggregateError> {
        let now = self.clock.now();
        if let Some(index) = self.fresh_in_memory(now) {
            return Ok(index);
        }

        if let Some(cached) = self.cache.get::<CachedIndex>(Namespace::Prices, INDEX_KEY).await {
            if now - cached.refreshed_at < self.config.refresh_interval {
                debug!(refreshed_at = %cached.refreshed_at, "Adopting cached price index");
                return Ok(self.adopt(cached.index, cached.refreshed_at));
            }
        }

        self.refresh().await
    }

    fn fresh_in_memory(&self, now: DateTime<Utc>) -> Option<Arc<PriceIndex>> {
        let state = self.state.read();
        let refreshed_at = state.refreshed_at?;
        if now - refreshed_at < self.config.refresh_interval {
            state.index.clone()
        } else {
            None
        }
    }

    fn adopt(&self, index: PriceIndex, refreshed_at: DateTime<Utc>) -> Arc<PriceIndex> {
        let index = Arc::new(index);
        let mut state = self.state.write();
        state.index = Some(Arc::clone(&index));
        state.refreshed_at = Some(refreshed_at);
        index
    }

    /// Query every source now, regardless of the index age.
    ///
    /// If nothing usable comes back, the previous index is returned while
    /// its cache entry is still valid; otherwise
    /// [`AggregateError::NoDataAvailable`].
    pub async fn refresh(&self) -> Result<Arc<PriceIndex>, AggregateError> {
        let results =
            join_all(self.sources.iter().map(|source| fetch_source(source.as_ref()))).await;

        let mut merged = PriceIndex::new();
        let mut report = RefreshReport::default();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(fetched) => {
                    report.outcomes.push(SourceOutcome::Fetched {
                        source: source.name().to_string(),
                        listings: fetched.listings.len(),
                        edges: fetched.edges.len(),
                    });
                    for listing in fetched.listings {
                        merged.insert_listing(listing);
                    }
                    for edge in fetched.edges {
                        merged.insert_edge(edge);
                    }
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Price source excluded from refresh");
                    report.outcomes.push(SourceOutcome::Failed {
                        source: source.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            sources = report.outcomes.len(),
            failed = report.failed(),
            ships = merged.ship_count(),
            listings = merged.listing_count(),
            edges = merged.edge_count(),
            "Price refresh complete"
        );
        self.state.write().last_report = Some(report);

        if merged.is_empty() {
            return self.fallback().await;
        }

        let now = self.clock.now();
        self.history.lock().record(&merged);
        let cached = CachedIndex {
            refreshed_at: now,
            index: merged,
        };
        self.cache.set(Namespace::Prices, INDEX_KEY, &cached, None).await;
        Ok(self.adopt(cached.index, now))
    }

    async fn fallback(&self) -> Result<Arc<PriceIndex>, AggregateError> {
        match self.cache.get::<CachedIndex>(Namespace::Prices, INDEX_KEY).await {
            Some(cached) => {
                warn!(
                    refreshed_at = %cached.refreshed_at,
                    "No fresh prices, serving previous index"
                );
                let index = Arc::new(cached.index);
                self.state.write().index = Some(Arc::clone(&index));
                Ok(index)
            }
            None => {
                warn!("No fresh prices and no valid cached index");
                Err(AggregateError::NoDataAvailable)
            }
        }
    }

    /// Results of the most recent refresh, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<RefreshReport> {
        self.state.read().last_report.clone()
    }

    /// When the current index was built.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().refreshed_at
    }

    /// Sampled prices for a ship, oldest first.
    #[must_use]
    pub fn history(&self, ship: &ShipKey) -> Vec<PriceSample> {
        self.history.lock().for_ship(ship)
    }

    /// Lowest sampled price for a ship.
    #[must_use]
    pub fn lowest_seen(&self, ship: &ShipKey) -> Option<PriceSample> {
        self.history.lock().lowest(ship)
    }
}

/// Fetch listings and offers from one source concurrently.
///
/// The source counts as failed only if both calls fail; a partial answer
/// is still merged.
async fn fetch_source(source: &dyn PriceSource) -> Result<Fetched, SourceError> {
    let (listings, edges) = tokio::join!(source.fetch_listings(), source.fetch_upgrade_edges());

    match (listings, edges) {
        (Ok(listings), Ok(edges)) => Ok(Fetched { listings, edges }),
        (Ok(listings), Err(e)) => {
            warn!(source = source.name(), error = %e, "Upgrade offers unavailable");
            Ok(Fetched {
                listings,
                edges: Vec::new(),
            })
        }
        (Err(e), Ok(edges)) => {
            warn!(source = source.name(), error = %e, "Listings unavailable");
            Ok(Fetched {
                listings: Vec::new(),
                edges,
            })
        }
        (Err(e), Err(_)) => Err(e),
    }
}
