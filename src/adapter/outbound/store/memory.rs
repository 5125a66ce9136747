//! In-memory alert store for tests and ephemeral runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{AlertId, OwnerId, PriceAlert};
use crate::error::{Error, Result};
use crate::port::outbound::store::AlertStore;

/// Alerts kept in a map; lost on exit.
#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<HashMap<AlertId, PriceAlert>>,
}

impl MemoryAlertStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut alerts: Vec<PriceAlert>) -> Vec<PriceAlert> {
        alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        alerts
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn insert(&self, alert: &PriceAlert) -> Result<()> {
        let mut alerts = self.alerts.write();
        if alerts.contains_key(&alert.id) {
            return Err(Error::Storage(format!("alert {} already exists", alert.id)));
        }
        alerts.insert(alert.id, alert.clone());
        Ok(())
    }

    async fn update(&self, alert: &PriceAlert) -> Result<bool> {
        let mut alerts = self.alerts.write();
        match alerts.get_mut(&alert.id) {
            Some(existing) if existing.active => {
                *existing = alert.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get(&self, id: &AlertId) -> Result<Option<PriceAlert>> {
        Ok(self.alerts.read().get(id).cloned())
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<PriceAlert>> {
        let alerts = self
            .alerts
            .read()
            .values()
            .filter(|alert| &alert.owner_id == owner)
            .cloned()
            .collect();
        Ok(Self::sorted(alerts))
    }

    async fn list_active(&self) -> Result<Vec<PriceAlert>> {
        let alerts = self
            .alerts
            .read()
            .values()
            .filter(|alert| alert.active)
            .cloned()
            .collect();
        Ok(Self::sorted(alerts))
    }

    async fn delete(&self, id: &AlertId) -> Result<bool> {
        Ok(self.alerts.write().remove(id).is_some())
    }

    async fn prune_inactive(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut alerts = self.alerts.write();
        let before = alerts.len();
        alerts.retain(|_, alert| alert.active || alert.settled_at() >= cutoff);
        Ok(before - alerts.len())
    }
}
