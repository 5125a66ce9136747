//! Upgrade path search engine.
//!
//! Breadth-first enumeration of every simple path through the upgrade
//! offer graph, bounded by a step limit, followed by scoring and ranking.

use std::collections::{BTreeSet, VecDeque};

use rust_decimal::Decimal;
use tracing::debug;

use super::score::ScoringConfig;
use crate::domain::{
    PriceIndex, SearchOutcome, Ship, ShipKey, Store, UpgradeEdge, UpgradePath, UpgradeStep,
};
use crate::error::SearchError;

/// Default step limit for a search.
pub const DEFAULT_MAX_STEPS: usize = 3;

/// Parameters for one search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub from: Ship,
    pub to: Ship,
    /// Restrict offers to these stores. `None` or an empty set allows all.
    pub stores: Option<BTreeSet<Store>>,
    pub max_steps: usize,
}

impl SearchRequest {
    pub fn new(from: Ship, to: Ship) -> Self {
        Self {
            from,
            to,
            stores: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    #[must_use]
    pub fn with_stores(mut self, stores: BTreeSet<Store>) -> Self {
        self.stores = Some(stores);
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    fn allows(&self, store: &Store) -> bool {
        match &self.stores {
            Some(stores) if !stores.is_empty() => stores.contains(store),
            _ => true,
        }
    }
}

/// A path under construction.
struct Partial<'a> {
    current: &'a ShipKey,
    edges: Vec<&'a UpgradeEdge>,
    visited: BTreeSet<&'a ShipKey>,
}

/// Stateless search over a [`PriceIndex`].
#[derive(Debug, Clone, Default)]
pub struct UpgradePathEngine {
    scoring: ScoringConfig,
}

impl UpgradePathEngine {
    pub const fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// Find, score and rank every upgrade path from `request.from` to
    /// `request.to`, keeping the best `max_results` ranked paths.
    ///
    /// An unreachable target yields an empty [`SearchOutcome`] with a
    /// reason, not an error.
    pub fn search(
        &self,
        index: &PriceIndex,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        self.rank(index, request, Some(self.scoring.max_results))
    }

    /// Like [`search`](Self::search) but returns every ranked path.
    ///
    /// Ranking is by score, not cost, so a capped list can drop the
    /// cheapest path. Price checks must see all of them.
    pub fn search_uncapped(
        &self,
        index: &PriceIndex,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        self.rank(index, request, None)
    }

    fn rank(
        &self,
        index: &PriceIndex,
        request: &SearchRequest,
        cap: Option<usize>,
    ) -> Result<SearchOutcome, SearchError> {
        let from = request.from.key();
        let to = request.to.key();
        if request.max_steps == 0 {
            return Err(SearchError::InvalidDepth);
        }
        if from == to {
            return Err(SearchError::SameShip {
                name: request.from.name.clone(),
            });
        }

        let found = self.enumerate(index, &from, &to, request);
        debug!(from = %from, to = %to, paths = found.len(), "Path enumeration complete");

        if found.is_empty() {
            let reason = if index.edges_from(&from).next().is_none() {
                format!("no upgrade offers from {}", request.from.name)
            } else {
                format!(
                    "no route to {} within {} steps",
                    request.to.name, request.max_steps
                )
            };
            return Ok(SearchOutcome::no_path(from, to, reason));
        }

        let mut paths: Vec<UpgradePath> = found
            .iter()
            .map(|edges| self.build_path(edges, &request.from, &request.to))
            .collect();
        paths.sort_by(|a, b| {
            a.efficiency_score
                .cmp(&b.efficiency_score)
                .then_with(|| a.total_cost.cmp(&b.total_cost))
                .then_with(|| a.step_count().cmp(&b.step_count()))
        });

        let mut direct: Vec<UpgradePath> =
            paths.iter().filter(|p| p.is_direct()).cloned().collect();
        direct.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));
        if let Some(cap) = cap {
            paths.truncate(cap);
        }

        Ok(SearchOutcome {
            from,
            to,
            paths,
            direct,
            no_path_reason: None,
        })
    }

    fn enumerate<'a>(
        &self,
        index: &'a PriceIndex,
        from: &'a ShipKey,
        to: &ShipKey,
        request: &SearchRequest,
    ) -> Vec<Vec<&'a UpgradeEdge>> {
        let mut complete = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(Partial {
            current: from,
            edges: Vec::new(),
            visited: BTreeSet::from([from]),
        });

        while let Some(partial) = queue.pop_front() {
            if partial.current == to {
                complete.push(partial.edges);
                continue;
            }
            if partial.edges.len() >= request.max_steps {
                continue;
            }

            for edge in index.edges_from(partial.current) {
                if !edge.is_traversable()
                    || !request.allows(&edge.store)
                    || partial.visited.contains(&edge.to)
                {
                    continue;
                }
                let mut edges = partial.edges.clone();
                edges.push(edge);
                let mut visited = partial.visited.clone();
                visited.insert(&edge.to);
                queue.push_back(Partial {
                    current: &edge.to,
                    edges,
                    visited,
                });
            }
        }
        complete
    }

    fn build_path(&self, edges: &[&UpgradeEdge], from: &Ship, to: &Ship) -> UpgradePath {
        let steps: Vec<UpgradeStep> = edges.iter().map(|edge| UpgradeStep::from(*edge)).collect();
        let total_cost: Decimal = steps.iter().map(|step| step.price).sum();
        let risk_level = self.scoring.path_risk(&steps);
        let efficiency_score = self
            .scoring
            .efficiency_score(total_cost, steps.len(), risk_level);
        let savings = match (from.base_price, to.base_price) {
            (Some(from_price), Some(to_price)) => {
                (to_price - from_price - total_cost).max(Decimal::ZERO)
            }
            _ => Decimal::ZERO,
        };

        UpgradePath {
            time_estimate: self.scoring.time_estimate(steps.len()),
            steps,
            total_cost,
            efficiency_score,
            risk_level,
            savings,
        }
    }
}
