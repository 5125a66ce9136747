//! Price source port.
//!
//! One implementation per marketplace. Each normalizes its raw data into
//! [`PriceListing`]s and [`UpgradeEdge`]s; the aggregator only ever sees
//! this trait.

use async_trait::async_trait;

use crate::domain::{PriceListing, UpgradeEdge};
use crate::error::SourceError;

/// A marketplace that publishes ship prices and upgrade offers.
///
/// # Implementation Notes
///
/// - An unreachable site is an `Err`, never a panic. The aggregator logs
///   it and carries on with the other sources.
/// - Retries for transient network failures belong to the implementation
///   and must be bounded.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch standalone ship package prices.
    async fn fetch_listings(&self) -> Result<Vec<PriceListing>, SourceError>;

    /// Fetch direct upgrade offers.
    async fn fetch_upgrade_edges(&self) -> Result<Vec<UpgradeEdge>, SourceError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
