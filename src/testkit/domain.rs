//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions so tests focus on assertions rather
//! than construction boilerplate.

use rust_decimal::Decimal;

use crate::domain::{PriceIndex, PriceListing, Ship, ShipKey, Store, UpgradeEdge};

/// Create a [`Ship`] without a base price.
pub fn ship(name: &str) -> Ship {
    Ship::new(name)
}

/// Create a [`Ship`] with a base price.
pub fn priced_ship(name: &str, base_price: Decimal) -> Ship {
    Ship::new(name).with_base_price(base_price)
}

/// Create an in-stock upgrade offer.
pub fn edge(from: &str, to: &str, store: Store, price: Decimal) -> UpgradeEdge {
    UpgradeEdge::new(ShipKey::new(from), ShipKey::new(to), store, price)
        .with_availability("In stock")
}

/// Create a standalone listing.
///
/// # Panics
///
/// Panics on a negative price.
pub fn listing(ship: &str, store: Store, price: Decimal) -> PriceListing {
    PriceListing::try_new(ShipKey::new(ship), store, price)
        .expect("test listing price must not be negative")
        .with_availability("In stock")
}

/// Build an index from upgrade offers only.
pub fn index_of(edges: impl IntoIterator<Item = UpgradeEdge>) -> PriceIndex {
    let mut index = PriceIndex::new();
    for edge in edges {
        index.insert_edge(edge);
    }
    index
}
