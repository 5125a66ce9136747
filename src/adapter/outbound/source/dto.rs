//! Marketplace feed documents.
//!
//! A feed is one JSON object:
//!
//! ```json
//! {
//!   "listings": [{ "ship": "Aurora MR", "price": "25.00", "availability": "In stock" }],
//!   "upgrades": [{ "from": "Aurora MR", "to": "Avenger Titan", "price": 35 }]
//! }
//! ```
//!
//! Prices may be JSON numbers or strings. A row may name its own `store`;
//! otherwise the source's configured store applies. Scraped feeds are
//! messy, so a row whose price or names cannot be read is dropped on its
//! own instead of failing the whole document.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{PriceListing, ShipKey, Store, UpgradeEdge};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub listings: Vec<FeedListing>,
    #[serde(default)]
    pub upgrades: Vec<FeedUpgrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedListing {
    #[serde(default, deserialize_with = "lenient_text")]
    pub ship: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedUpgrade {
    #[serde(default, deserialize_with = "lenient_text")]
    pub from: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub to: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A price from a number or a string such as `"25.00"` or `"$25"`.
/// Anything else (`null`, `"N/A"`, objects) reads as `None`.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = match &value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', ""),
        _ => return Ok(None),
    };
    Ok(Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok())
}

/// A name from a string. Non-strings read as empty and the row is dropped.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn row_store(row_store: Option<&str>, default: &Store) -> Store {
    row_store.map_or_else(|| default.clone(), Store::parse)
}

impl FeedDocument {
    /// Normalized listings. Rows without a ship name, or with a missing,
    /// unreadable or negative price, are dropped.
    pub fn listings(
        &self,
        source: &str,
        store: &Store,
        observed_at: DateTime<Utc>,
    ) -> Vec<PriceListing> {
        self.listings
            .iter()
            .filter_map(|row| {
                let ship = ShipKey::new(&row.ship);
                if ship.is_empty() {
                    warn!(source, ship = %row.ship, "Skipping listing without a ship name");
                    return None;
                }
                let Some(price) = row.price else {
                    warn!(source, ship = %row.ship, "Skipping listing without a readable price");
                    return None;
                };
                let store = row_store(row.store.as_deref(), store);
                let listing = match PriceListing::try_new(ship, store, price) {
                    Ok(listing) => listing,
                    Err(e) => {
                        warn!(source, ship = %row.ship, error = %e, "Skipping invalid listing");
                        return None;
                    }
                };
                let mut listing = listing
                    .with_availability(row.availability.clone().unwrap_or_default())
                    .observed_at(observed_at);
                if let Some(url) = &row.url {
                    listing = listing.with_url(url.clone());
                }
                Some(listing)
            })
            .collect()
    }

    /// Normalized upgrade offers. Rows missing either ship or a readable
    /// price are dropped; other prices pass through unchanged.
    pub fn upgrades(
        &self,
        source: &str,
        store: &Store,
        observed_at: DateTime<Utc>,
    ) -> Vec<UpgradeEdge> {
        self.upgrades
            .iter()
            .filter_map(|row| {
                let from = ShipKey::new(&row.from);
                let to = ShipKey::new(&row.to);
                if from.is_empty() || to.is_empty() {
                    warn!(
                        source,
                        from = %row.from,
                        to = %row.to,
                        "Skipping upgrade without both ships"
                    );
                    return None;
                }
                let Some(price) = row.price else {
                    warn!(
                        source,
                        from = %row.from,
                        to = %row.to,
                        "Skipping upgrade without a readable price"
                    );
                    return None;
                };
                let store = row_store(row.store.as_deref(), store);
                let mut edge = UpgradeEdge::new(from, to, store, price)
                    .with_availability(row.availability.clone().unwrap_or_default())
                    .observed_at(observed_at);
                if let Some(url) = &row.url {
                    edge = edge.with_url(url.clone());
                }
                Some(edge)
            })
            .collect()
    }
}
