//! Typed snapshot of the latest prices across all stores.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::id::ShipKey;
use super::listing::{PriceListing, UpgradeEdge};
use super::store::Store;

/// Latest price per (ship, store) and latest upgrade offer per
/// (from, to, store).
///
/// Both maps hold at most one entry per key; inserting again replaces the
/// previous entry (last write wins). Ordered maps keep iteration and
/// equality deterministic, so merging identical inputs always yields equal
/// indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexSnapshot", into = "IndexSnapshot")]
pub struct PriceIndex {
    listings: BTreeMap<ShipKey, BTreeMap<Store, PriceListing>>,
    edges: BTreeMap<ShipKey, BTreeMap<(ShipKey, Store), UpgradeEdge>>,
}

impl PriceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the listing for its (ship, store).
    pub fn insert_listing(&mut self, listing: PriceListing) {
        self.listings
            .entry(listing.ship.clone())
            .or_default()
            .insert(listing.store.clone(), listing);
    }

    /// Insert or replace the upgrade offer for its (from, to, store).
    pub fn insert_edge(&mut self, edge: UpgradeEdge) {
        self.edges
            .entry(edge.from.clone())
            .or_default()
            .insert((edge.to.clone(), edge.store.clone()), edge);
    }

    /// Merge another index into this one; entries from `other` win.
    pub fn merge(&mut self, other: PriceIndex) {
        let snapshot = IndexSnapshot::from(other);
        for listing in snapshot.listings {
            self.insert_listing(listing);
        }
        for edge in snapshot.edges {
            self.insert_edge(edge);
        }
    }

    /// Listing for a ship at one store.
    #[must_use]
    pub fn listing(&self, ship: &ShipKey, store: &Store) -> Option<&PriceListing> {
        self.listings.get(ship).and_then(|by_store| by_store.get(store))
    }

    /// All listings for a ship, ordered by store.
    pub fn listings_for<'a>(
        &'a self,
        ship: &ShipKey,
    ) -> impl Iterator<Item = &'a PriceListing> + 'a {
        self.listings
            .get(ship)
            .into_iter()
            .flat_map(|by_store| by_store.values())
    }

    /// Cheapest listing for a ship across all stores.
    #[must_use]
    pub fn cheapest_listing(&self, ship: &ShipKey) -> Option<&PriceListing> {
        self.listings_for(ship).min_by_key(|listing| listing.price)
    }

    /// Upgrade offers leaving a ship, across all stores.
    pub fn edges_from<'a>(&'a self, ship: &ShipKey) -> impl Iterator<Item = &'a UpgradeEdge> + 'a {
        self.edges
            .get(ship)
            .into_iter()
            .flat_map(|by_target| by_target.values())
    }

    /// Upgrade offer for one (from, to, store), if listed.
    #[must_use]
    pub fn edge(&self, from: &ShipKey, to: &ShipKey, store: &Store) -> Option<&UpgradeEdge> {
        self.edges
            .get(from)
            .and_then(|by_target| by_target.get(&(to.clone(), store.clone())))
    }

    /// Every store that contributed at least one listing or offer.
    #[must_use]
    pub fn stores(&self) -> BTreeSet<Store> {
        let listed = self
            .listings
            .values()
            .flat_map(|by_store| by_store.keys().cloned());
        let offered = self
            .edges
            .values()
            .flat_map(|by_target| by_target.keys().map(|(_, store)| store.clone()));
        listed.chain(offered).collect()
    }

    /// Number of ships with at least one listing.
    #[must_use]
    pub fn ship_count(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn listing_count(&self) -> usize {
        self.listings.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// True when the index holds neither listings nor offers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty() && self.edges.is_empty()
    }

    /// Iterate every listing, ordered by ship then store.
    pub fn iter_listings(&self) -> impl Iterator<Item = &PriceListing> {
        self.listings.values().flat_map(|by_store| by_store.values())
    }
}

/// Flat serialized form of [`PriceIndex`].
///
/// Tuple map keys do not survive JSON, so the index is persisted as two
/// lists and rebuilt through the same insert path on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IndexSnapshot {
    #[serde(default)]
    listings: Vec<PriceListing>,
    #[serde(default)]
    edges: Vec<UpgradeEdge>,
}

impl From<PriceIndex> for IndexSnapshot {
    fn from(index: PriceIndex) -> Self {
        Self {
            listings: index
                .listings
                .into_values()
                .flat_map(BTreeMap::into_values)
                .collect(),
            edges: index
                .edges
                .into_values()
                .flat_map(BTreeMap::into_values)
                .collect(),
        }
    }
}

impl From<IndexSnapshot> for PriceIndex {
    fn from(snapshot: IndexSnapshot) -> Self {
        let mut index = Self::new();
        for listing in snapshot.listings {
            index.insert_listing(listing);
        }
        for edge in snapshot.edges {
            index.insert_edge(edge);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(ship: &str, store: Store, price: rust_decimal::Decimal) -> PriceListing {
        PriceListing::try_new(ShipKey::new(ship), store, price).unwrap()
    }

    #[test]
    fn one_listing_per_ship_and_store() {
        let mut index = PriceIndex::new();
        index.insert_listing(listing("Cutlass Black", Store::Rsi, dec!(110)));
        index.insert_listing(listing("Cutlass Black", Store::Rsi, dec!(100)));
        index.insert_listing(listing("Cutlass Black", Store::Grey, dec!(95)));

        assert_eq!(index.listing_count(), 2);
        let key = ShipKey::new("Cutlass Black");
        assert_eq!(index.listing(&key, &Store::Rsi).unwrap().price, dec!(100));
        assert_eq!(index.cheapest_listing(&key).unwrap().store, Store::Grey);
    }

    #[test]
    fn one_edge_per_route_and_store() {
        let mut index = PriceIndex::new();
        index.insert_edge(UpgradeEdge::new("A".into(), "B".into(), Store::Grey, dec!(50)));
        index.insert_edge(UpgradeEdge::new("A".into(), "B".into(), Store::Grey, dec!(45)));
        index.insert_edge(UpgradeEdge::new("A".into(), "B".into(), Store::Rsi, dec!(60)));
        index.insert_edge(UpgradeEdge::new("A".into(), "C".into(), Store::Rsi, dec!(70)));

        assert_eq!(index.edge_count(), 3);
        let a = ShipKey::new("A");
        assert_eq!(index.edges_from(&a).count(), 3);
        assert_eq!(
            index.edge(&a, &ShipKey::new("B"), &Store::Grey).unwrap().price,
            dec!(45)
        );
    }

    #[test]
    fn merge_prefers_incoming_entries() {
        let mut base = PriceIndex::new();
        base.insert_listing(listing("Aurora MR", Store::Rsi, dec!(25)));

        let mut incoming = PriceIndex::new();
        incoming.insert_listing(listing("Aurora MR", Store::Rsi, dec!(20)));
        incoming.insert_listing(listing("Mustang Alpha", Store::Rsi, dec!(30)));

        base.merge(incoming);
        assert_eq!(base.ship_count(), 2);
        assert_eq!(
            base.listing(&ShipKey::new("Aurora MR"), &Store::Rsi).unwrap().price,
            dec!(20)
        );
    }

    #[test]
    fn serde_preserves_contents() {
        let mut index = PriceIndex::new();
        index.insert_listing(listing("Aurora MR", Store::Rsi, dec!(25)));
        index.insert_edge(UpgradeEdge::new(
            "Aurora MR".into(),
            "Avenger".into(),
            Store::Rsi,
            dec!(35),
        ));

        let json = serde_json::to_string(&index).unwrap();
        let restored: PriceIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, index);
        assert_eq!(restored.stores(), BTreeSet::from([Store::Rsi]));
    }
}
