//! Ship reference data.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::ShipKey;
use super::money::Price;

/// A purchasable ship package as known to the catalog.
///
/// The display name is kept as given; [`Ship::key`] is the normalized
/// form used for every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Display name.
    pub name: String,
    /// Manufacturer, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Standalone price in USD, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<Price>,
}

impl Ship {
    /// Create a ship with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: None,
            base_price: None,
        }
    }

    /// Create a ship, rejecting names without any alphanumeric characters.
    pub fn try_new(name: impl Into<String>) -> Result<Self, DomainError> {
        let ship = Self::new(name);
        if ship.key().is_empty() {
            return Err(DomainError::EmptyShipName { name: ship.name });
        }
        Ok(ship)
    }

    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn with_base_price(mut self, price: Price) -> Self {
        self.base_price = Some(price);
        self
    }

    /// Normalized lookup key.
    #[must_use]
    pub fn key(&self) -> ShipKey {
        ShipKey::new(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn key_is_normalized_name() {
        let ship = Ship::new("Constellation Andromeda")
            .with_manufacturer("RSI")
            .with_base_price(dec!(240));
        assert_eq!(ship.key().as_str(), "constellationandromeda");
        assert_eq!(ship.base_price, Some(dec!(240)));
    }

    #[test]
    fn try_new_rejects_blank_names() {
        assert!(matches!(
            Ship::try_new("  !! "),
            Err(DomainError::EmptyShipName { .. })
        ));
        assert!(Ship::try_new("Aurora MR").is_ok());
    }
}
