//! Normalized price observations produced by price sources.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::ShipKey;
use super::money::Price;
use super::store::Store;

/// A standalone ship package offered by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListing {
    pub ship: ShipKey,
    pub store: Store,
    pub price: Price,
    /// Free-text availability as published by the store.
    #[serde(default)]
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl PriceListing {
    /// Create a listing observed now, rejecting negative prices.
    pub fn try_new(ship: ShipKey, store: Store, price: Price) -> Result<Self, DomainError> {
        if price < Decimal::ZERO {
            return Err(DomainError::NegativePrice { price });
        }
        Ok(Self {
            ship,
            store,
            price,
            availability: String::new(),
            url: None,
            observed_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn with_availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = availability.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = at;
        self
    }
}

/// A direct upgrade offer: pay `price` at `store` to turn `from` into `to`.
///
/// Negative prices are representable because scraped data can contain
/// them; the path engine refuses to traverse such edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeEdge {
    pub from: ShipKey,
    pub to: ShipKey,
    pub store: Store,
    pub price: Price,
    #[serde(default)]
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl UpgradeEdge {
    pub fn new(from: ShipKey, to: ShipKey, store: Store, price: Price) -> Self {
        Self {
            from,
            to,
            store,
            price,
            availability: String::new(),
            url: None,
            observed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = availability.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = at;
        self
    }

    /// True when the offer would cost a non-negative amount.
    #[must_use]
    pub fn is_traversable(&self) -> bool {
        self.price >= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn listing_rejects_negative_price() {
        let result = PriceListing::try_new(ShipKey::new("Aurora"), Store::Rsi, dec!(-5));
        assert_eq!(result, Err(DomainError::NegativePrice { price: dec!(-5) }));
    }

    #[test]
    fn listing_accepts_zero_price() {
        let listing = PriceListing::try_new(ShipKey::new("Aurora"), Store::Rsi, dec!(0)).unwrap();
        assert_eq!(listing.price, dec!(0));
    }

    #[test]
    fn negative_edges_are_not_traversable() {
        let edge = UpgradeEdge::new("A".into(), "B".into(), Store::Grey, dec!(-10));
        assert!(!edge.is_traversable());
        let edge = UpgradeEdge::new("A".into(), "B".into(), Store::Grey, dec!(0));
        assert!(edge.is_traversable());
    }
}
