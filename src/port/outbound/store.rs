//! Persistence port for price alerts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AlertId, OwnerId, PriceAlert};
use crate::error::Result;

/// Storage operations for alerts.
///
/// The scheduler and alert service depend only on this trait, so the
/// backing store (flat file, embedded DB, SQL table) can change freely.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Save a new alert.
    async fn insert(&self, alert: &PriceAlert) -> Result<()>;

    /// Replace an existing active alert. Returns `false` if it does not
    /// exist or is already inactive; deactivation is final.
    async fn update(&self, alert: &PriceAlert) -> Result<bool>;

    /// Get an alert by ID.
    async fn get(&self, id: &AlertId) -> Result<Option<PriceAlert>>;

    /// All alerts of one owner, active or not, oldest first.
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<PriceAlert>>;

    /// All active alerts, oldest first.
    async fn list_active(&self) -> Result<Vec<PriceAlert>>;

    /// Delete an alert by ID. Returns `false` if it did not exist.
    async fn delete(&self, id: &AlertId) -> Result<bool>;

    /// Delete inactive alerts that settled before `cutoff`. Returns count
    /// deleted.
    async fn prune_inactive(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
