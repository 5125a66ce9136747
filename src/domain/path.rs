//! Upgrade paths and search results.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ShipKey;
use super::listing::UpgradeEdge;
use super::money::Price;
use super::store::Store;

/// One purchase in an upgrade path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeStep {
    pub from: ShipKey,
    pub to: ShipKey,
    pub store: Store,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub availability: String,
}

impl From<&UpgradeEdge> for UpgradeStep {
    fn from(edge: &UpgradeEdge) -> Self {
        Self {
            from: edge.from.clone(),
            to: edge.to.clone(),
            store: edge.store.clone(),
            price: edge.price,
            url: edge.url.clone(),
            availability: edge.availability.clone(),
        }
    }
}

/// A scored sequence of upgrade purchases.
///
/// Built only by the path engine, which guarantees `total_cost` is the sum
/// of step prices and that no ship repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePath {
    pub steps: Vec<UpgradeStep>,
    pub total_cost: Price,
    /// Composite ranking metric; lower is better.
    pub efficiency_score: Decimal,
    /// Aggregated purchase risk in `[0, 1]`.
    pub risk_level: Decimal,
    pub time_estimate: Duration,
    /// Amount saved versus the difference in base prices, never negative.
    pub savings: Price,
}

impl UpgradePath {
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// True for single-purchase upgrades.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.steps.len() == 1
    }

    /// Ships visited in order, starting ship first.
    #[must_use]
    pub fn ships(&self) -> Vec<&ShipKey> {
        let mut ships: Vec<&ShipKey> = self.steps.first().map(|s| &s.from).into_iter().collect();
        ships.extend(self.steps.iter().map(|s| &s.to));
        ships
    }

    /// Human-readable route, e.g. `aurora -> avenger -> cutlass`.
    #[must_use]
    pub fn route(&self) -> String {
        self.ships()
            .iter()
            .map(|ship| ship.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Stores used by each step, joined.
    #[must_use]
    pub fn store_path(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.store.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Result of an upgrade path search.
///
/// An empty result is not an error: `no_path_reason` explains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub from: ShipKey,
    pub to: ShipKey,
    /// All complete paths, best efficiency score first.
    pub paths: Vec<UpgradePath>,
    /// Single-step upgrades, cheapest first, regardless of rank.
    pub direct: Vec<UpgradePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_path_reason: Option<String>,
}

impl SearchOutcome {
    /// Empty result with an explanation.
    pub fn no_path(from: ShipKey, to: ShipKey, reason: impl Into<String>) -> Self {
        Self {
            from,
            to,
            paths: Vec::new(),
            direct: Vec::new(),
            no_path_reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.direct.is_empty()
    }

    /// Best-ranked path.
    #[must_use]
    pub fn best(&self) -> Option<&UpgradePath> {
        self.paths.first()
    }

    /// Cheapest path across ranked paths and direct upgrades.
    #[must_use]
    pub fn cheapest(&self) -> Option<&UpgradePath> {
        self.paths
            .iter()
            .chain(self.direct.iter())
            .min_by_key(|path| path.total_cost)
    }

    /// Lowest total cost across ranked paths and direct upgrades.
    #[must_use]
    pub fn best_price(&self) -> Option<Price> {
        self.cheapest().map(|path| path.total_cost)
    }
}
