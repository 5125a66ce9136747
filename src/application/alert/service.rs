//! Alert creation, listing and removal.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::info;

use crate::application::upgrade::service::UpgradeService;
use crate::domain::{AlertId, OwnerId, Price, PriceAlert, Store};
use crate::error::{AlertError, Error, Result, SearchError};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::AlertStore;

/// Limits applied to alert creation and housekeeping.
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    /// Active alerts allowed per owner.
    pub max_active_per_owner: usize,
    /// Age after which settled alerts are deleted.
    pub retention: Duration,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            max_active_per_owner: 10,
            retention: Duration::days(30),
        }
    }
}

/// Create, list and remove alerts on behalf of their owners.
pub struct AlertService {
    store: Arc<dyn AlertStore>,
    upgrades: Arc<UpgradeService>,
    clock: Arc<dyn Clock>,
    policy: AlertPolicy,
    // Serializes the count-then-insert in `create_alert`.
    create_lock: Mutex<()>,
}

impl AlertService {
    pub fn new(
        store: Arc<dyn AlertStore>,
        upgrades: Arc<UpgradeService>,
        clock: Arc<dyn Clock>,
        policy: AlertPolicy,
    ) -> Self {
        Self {
            store,
            upgrades,
            clock,
            policy,
            create_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Register a new active alert and return its id.
    ///
    /// Ship names are resolved through the catalog. An empty store set
    /// watches every known store.
    pub async fn create_alert(
        &self,
        owner: &OwnerId,
        from: &str,
        to: &str,
        max_price: Price,
        stores: BTreeSet<Store>,
    ) -> Result<AlertId> {
        if max_price < Decimal::ZERO {
            return Err(AlertError::InvalidPrice { price: max_price }.into());
        }
        let from = self.upgrades.resolve(from).await?;
        let to = self.upgrades.resolve(to).await?;
        if from.key() == to.key() {
            return Err(SearchError::SameShip { name: from.name }.into());
        }

        let _guard = self.create_lock.lock().await;
        let active = self
            .store
            .list_by_owner(owner)
            .await?
            .iter()
            .filter(|alert| alert.active)
            .count();
        if active >= self.policy.max_active_per_owner {
            return Err(AlertError::LimitExceeded {
                owner: owner.clone(),
                limit: self.policy.max_active_per_owner,
            }
            .into());
        }

        let alert = PriceAlert::try_new(
            owner.clone(),
            from.key(),
            to.key(),
            max_price,
            stores,
            self.clock.now(),
        )?;
        self.store.insert(&alert).await?;
        info!(
            owner = %owner,
            alert_id = %alert.id,
            from = %alert.from_ship,
            to = %alert.to_ship,
            max_price = %alert.max_price,
            "Alert created"
        );
        Ok(alert.id)
    }

    /// Active alerts of one owner, oldest first.
    pub async fn list_alerts(&self, owner: &OwnerId) -> Result<Vec<PriceAlert>> {
        let alerts = self.store.list_by_owner(owner).await?;
        Ok(alerts.into_iter().filter(|alert| alert.active).collect())
    }

    /// Deactivate an alert owned by `owner`.
    ///
    /// Unknown ids, alerts of other owners and already inactive alerts are
    /// all reported as not found.
    pub async fn remove_alert(&self, owner: &OwnerId, id: &AlertId) -> Result<()> {
        let not_found = || Error::from(AlertError::NotFound { id: *id });

        let mut alert = match self.store.get(id).await? {
            Some(alert) if &alert.owner_id == owner => alert,
            _ => return Err(not_found()),
        };
        if !alert.deactivate() {
            return Err(not_found());
        }
        if !self.store.update(&alert).await? {
            return Err(not_found());
        }
        info!(owner = %owner, alert_id = %id, "Alert removed");
        Ok(())
    }

    /// Delete inactive alerts settled more than `older_than` ago.
    pub async fn prune(&self, older_than: Duration) -> Result<usize> {
        let cutoff = self.clock.now() - older_than;
        let removed = self.store.prune_inactive(cutoff).await?;
        if removed > 0 {
            info!(removed, "Pruned settled alerts");
        }
        Ok(removed)
    }
}
