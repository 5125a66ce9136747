//! Search facade used by commands and the alert scheduler.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::engine::{SearchRequest, UpgradePathEngine};
use crate::application::aggregator::PriceAggregator;
use crate::application::cache::entry::Namespace;
use crate::application::cache::service::Cache;
use crate::domain::{PriceAlert, SearchOutcome, Ship, ShipKey, Store};
use crate::error::{Result, SearchError};
use crate::port::outbound::catalog::ShipCatalog;

/// Resolves ship names, fetches the current index and runs the engine.
pub struct UpgradeService {
    catalog: Arc<dyn ShipCatalog>,
    aggregator: Arc<PriceAggregator>,
    cache: Arc<Cache>,
    engine: UpgradePathEngine,
}

impl UpgradeService {
    pub fn new(
        catalog: Arc<dyn ShipCatalog>,
        aggregator: Arc<PriceAggregator>,
        cache: Arc<Cache>,
        engine: UpgradePathEngine,
    ) -> Self {
        Self {
            catalog,
            aggregator,
            cache,
            engine,
        }
    }

    pub fn aggregator(&self) -> &Arc<PriceAggregator> {
        &self.aggregator
    }

    /// Look a ship up by name, through the catalog cache.
    pub async fn resolve(&self, name: &str) -> std::result::Result<Ship, SearchError> {
        let key = ShipKey::new(name);
        if let Some(ship) = self.cache.get::<Ship>(Namespace::Catalog, key.as_str()).await {
            return Ok(ship);
        }
        let ship = self
            .catalog
            .find_ship_by_name(name)
            .await
            .ok_or_else(|| SearchError::ShipNotFound {
                name: name.to_string(),
            })?;
        self.cache.set(Namespace::Catalog, key.as_str(), &ship, None).await;
        Ok(ship)
    }

    /// Catalog suggestions for a partial name.
    pub async fn suggest(&self, query: &str, limit: usize) -> Vec<Ship> {
        self.catalog.search_ships(query, limit).await
    }

    /// Interactive search. Results are cached per index build.
    pub async fn search(
        &self,
        from: &str,
        to: &str,
        stores: Option<BTreeSet<Store>>,
        max_steps: usize,
    ) -> Result<SearchOutcome> {
        let from = self.resolve(from).await?;
        let to = self.resolve(to).await?;
        let index = self.aggregator.index().await?;

        let key = search_key(
            &from.key(),
            &to.key(),
            stores.as_ref(),
            max_steps,
            self.aggregator.refreshed_at().map(|at| at.timestamp_millis()),
        );
        if let Some(outcome) = self.cache.get::<SearchOutcome>(Namespace::Search, &key).await {
            debug!(key = %key, "Search served from cache");
            return Ok(outcome);
        }

        let mut request = SearchRequest::new(from, to).with_max_steps(max_steps);
        if let Some(stores) = stores {
            request = request.with_stores(stores);
        }
        let outcome = self.engine.search(&index, &request)?;
        self.cache.set(Namespace::Search, &key, &outcome, None).await;
        Ok(outcome)
    }

    /// Uncached, uncapped search restricted to an alert's stores.
    pub async fn search_for_alert(
        &self,
        alert: &PriceAlert,
        max_steps: usize,
    ) -> Result<SearchOutcome> {
        let from = self.resolve(alert.from_ship.as_str()).await?;
        let to = self.resolve(alert.to_ship.as_str()).await?;
        let index = self.aggregator.index().await?;

        let request = SearchRequest::new(from, to)
            .with_stores(alert.stores.clone())
            .with_max_steps(max_steps);
        Ok(self.engine.search_uncapped(&index, &request)?)
    }
}

fn search_key(
    from: &ShipKey,
    to: &ShipKey,
    stores: Option<&BTreeSet<Store>>,
    max_steps: usize,
    built_at: Option<i64>,
) -> String {
    let stores = stores
        .map(|set| set.iter().map(Store::as_str).collect::<Vec<_>>().join(","))
        .unwrap_or_default();
    format!(
        "{from}|{to}|{stores}|{max_steps}|{}",
        built_at.unwrap_or_default()
    )
}
