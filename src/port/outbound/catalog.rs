//! Ship catalog port. Read-only from the engine's point of view.

use async_trait::async_trait;

use crate::domain::Ship;

/// Lookup of ship reference data.
#[async_trait]
pub trait ShipCatalog: Send + Sync {
    /// Find a ship by name. Matching is on the normalized name.
    async fn find_ship_by_name(&self, name: &str) -> Option<Ship>;

    /// Ships whose names match `query`, best matches first.
    async fn search_ships(&self, query: &str, limit: usize) -> Vec<Ship>;
}
