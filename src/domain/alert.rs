//! User-defined price alerts.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{AlertId, OwnerId, ShipKey};
use super::money::Price;
use super::store::Store;

/// A request to be told once an upgrade from `from_ship` to `to_ship` can
/// be had for at most `max_price`.
///
/// `active` flips from `true` to `false` once, either when the alert
/// triggers or when its owner removes it. Inactive alerts are never
/// checked again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub id: AlertId,
    pub owner_id: OwnerId,
    pub from_ship: ShipKey,
    pub to_ship: ShipKey,
    pub max_price: Price,
    pub stores: BTreeSet<Store>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub triggered_at: Option<DateTime<Utc>>,
}

impl PriceAlert {
    /// Create an active alert.
    ///
    /// An empty store set means "every known store".
    pub fn try_new(
        owner_id: OwnerId,
        from_ship: ShipKey,
        to_ship: ShipKey,
        max_price: Price,
        stores: BTreeSet<Store>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if max_price < Decimal::ZERO {
            return Err(DomainError::NegativePrice { price: max_price });
        }
        if from_ship.is_empty() {
            return Err(DomainError::EmptyShipName {
                name: from_ship.to_string(),
            });
        }
        if to_ship.is_empty() {
            return Err(DomainError::EmptyShipName {
                name: to_ship.to_string(),
            });
        }
        let stores = if stores.is_empty() {
            Store::known().into_iter().collect()
        } else {
            stores
        };

        Ok(Self {
            id: AlertId::generate(),
            owner_id,
            from_ship,
            to_ship,
            max_price,
            stores,
            active: true,
            created_at: now,
            last_checked_at: None,
            triggered_at: None,
        })
    }

    /// True when the alert is active and has not been checked within
    /// `interval` of `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        if !self.active {
            return false;
        }
        match self.last_checked_at {
            None => true,
            Some(checked) => now - checked >= interval,
        }
    }

    /// Whether `price` satisfies the threshold.
    #[must_use]
    pub fn matches(&self, price: Price) -> bool {
        price <= self.max_price
    }

    pub fn mark_checked(&mut self, now: DateTime<Utc>) {
        self.last_checked_at = Some(now);
    }

    /// Consume the alert. Returns `false` if it was already inactive, in
    /// which case nothing changes.
    pub fn trigger(&mut self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.triggered_at = Some(now);
        true
    }

    /// Deactivate at the owner's request. Returns `false` if already
    /// inactive.
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Latest of the trigger and creation timestamps, used by housekeeping.
    #[must_use]
    pub fn settled_at(&self) -> DateTime<Utc> {
        self.triggered_at.unwrap_or(self.created_at)
    }
}
