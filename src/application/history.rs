//! Bounded price history per (ship, store).

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Price, PriceIndex, ShipKey, Store};

/// One observed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    pub ship: ShipKey,
    pub store: Store,
    pub price: Price,
    pub observed_at: DateTime<Utc>,
}

/// Ring buffers of recent samples, oldest dropped first.
pub struct PriceHistory {
    capacity: usize,
    samples: HashMap<(ShipKey, Store), VecDeque<PriceSample>>,
}

impl PriceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: HashMap::new(),
        }
    }

    /// Record every listing of a freshly built index.
    ///
    /// A listing whose timestamp matches the newest sample is skipped, so
    /// re-recording the same index does not duplicate history.
    pub fn record(&mut self, index: &PriceIndex) {
        for listing in index.iter_listings() {
            let ring = self
                .samples
                .entry((listing.ship.clone(), listing.store.clone()))
                .or_default();
            if ring
                .back()
                .is_some_and(|last| last.observed_at == listing.observed_at)
            {
                continue;
            }
            ring.push_back(PriceSample {
                ship: listing.ship.clone(),
                store: listing.store.clone(),
                price: listing.price,
                observed_at: listing.observed_at,
            });
            while ring.len() > self.capacity {
                ring.pop_front();
            }
        }
    }

    /// All samples for a ship across stores, oldest first.
    #[must_use]
    pub fn for_ship(&self, ship: &ShipKey) -> Vec<PriceSample> {
        let mut samples: Vec<PriceSample> = self
            .samples
            .iter()
            .filter(|((key, _), _)| key == ship)
            .flat_map(|(_, ring)| ring.iter().cloned())
            .collect();
        samples.sort_by(|a, b| {
            a.observed_at
                .cmp(&b.observed_at)
                .then_with(|| a.store.cmp(&b.store))
        });
        samples
    }

    /// Lowest price ever sampled for a ship.
    #[must_use]
    pub fn lowest(&self, ship: &ShipKey) -> Option<PriceSample> {
        self.for_ship(ship).into_iter().min_by_key(|sample| sample.price)
    }
}
