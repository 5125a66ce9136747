//! In-memory ship catalog.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::{Ship, ShipKey};
use crate::error::Result;
use crate::port::outbound::catalog::ShipCatalog;

/// Ships held in memory, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    ships: BTreeMap<ShipKey, Ship>,
}

impl MemoryCatalog {
    /// Build a catalog. Later duplicates replace earlier ones; ships whose
    /// name normalizes to nothing are ignored.
    pub fn new(ships: impl IntoIterator<Item = Ship>) -> Self {
        let ships = ships
            .into_iter()
            .filter(|ship| !ship.key().is_empty())
            .map(|ship| (ship.key(), ship))
            .collect();
        Self { ships }
    }

    /// Load a JSON array of ships.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ships: Vec<Ship> = serde_json::from_str(&content)?;
        Ok(Self::new(ships))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}

#[async_trait]
impl ShipCatalog for MemoryCatalog {
    async fn find_ship_by_name(&self, name: &str) -> Option<Ship> {
        self.ships.get(&ShipKey::new(name)).cloned()
    }

    /// Exact matches first, then prefix matches, then substring matches,
    /// each group in name order.
    async fn search_ships(&self, query: &str, limit: usize) -> Vec<Ship> {
        let query = ShipKey::new(query);
        let mut ranked: Vec<(u8, &Ship)> = self
            .ships
            .iter()
            .filter_map(|(key, ship)| {
                let rank = if query.is_empty() {
                    2
                } else if key == &query {
                    0
                } else if key.as_str().starts_with(query.as_str()) {
                    1
                } else if key.as_str().contains(query.as_str()) {
                    2
                } else {
                    return None;
                };
                Some((rank, ship))
            })
            .collect();
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked.into_iter().take(limit).map(|(_, ship)| ship.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new(vec![
            Ship::new("Cutlass Black"),
            Ship::new("Cutlass Blue"),
            Ship::new("Black Cutlass Replica"),
            Ship::new("Cutlass"),
            Ship::new("Avenger Titan"),
        ])
    }

    #[tokio::test]
    async fn lookup_ignores_case_and_punctuation() {
        let ship = catalog().find_ship_by_name("cutlass-black").await.unwrap();
        assert_eq!(ship.name, "Cutlass Black");
        assert!(catalog().find_ship_by_name("Idris").await.is_none());
    }

    #[tokio::test]
    async fn search_ranks_exact_then_prefix_then_substring() {
        let names: Vec<String> = catalog()
            .search_ships("cutlass", 10)
            .await
            .into_iter()
            .map(|ship| ship.name)
            .collect();
        assert_eq!(
            names,
            ["Cutlass", "Cutlass Black", "Cutlass Blue", "Black Cutlass Replica"]
        );
        assert_eq!(catalog().search_ships("cutlass", 2).await.len(), 2);
    }

    #[test]
    fn loads_json_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"[{"name": "Aurora MR", "manufacturer": "RSI", "base_price": "25"}]"#,
        )
        .unwrap();
        let catalog = MemoryCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
