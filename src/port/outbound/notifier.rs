//! Notifier port for alert deliveries.
//!
//! Defines the structured message sent when a price alert matches and the
//! trait that delivery backends implement.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{AlertId, OwnerId, PriceAlert, Price, UpgradePath};
use crate::error::NotifyError;

/// A matched price alert, ready to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// The alert that matched.
    pub alert_id: AlertId,
    /// Starting ship (normalized).
    pub from_ship: String,
    /// Target ship (normalized).
    pub to_ship: String,
    /// The owner's threshold.
    pub max_price: Price,
    /// Cheapest price found.
    pub best_price: Price,
    /// Path responsible for the best price.
    pub path: UpgradePath,
}

impl AlertMessage {
    /// Build the message for an alert and the path that satisfied it.
    #[must_use]
    pub fn new(alert: &PriceAlert, path: UpgradePath) -> Self {
        Self {
            alert_id: alert.id,
            from_ship: alert.from_ship.to_string(),
            to_ship: alert.to_ship.to_string(),
            max_price: alert.max_price,
            best_price: path.total_cost,
            path,
        }
    }
}

/// Delivery backend for alert messages.
///
/// Callers log failures and move on: a failed delivery never changes the
/// state of the alert that produced it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message to the given user.
    async fn send(&self, owner: &OwnerId, message: &AlertMessage) -> Result<(), NotifyError>;
}

/// Writes matched alerts to the log. Used when no chat backend is
/// configured; never fails.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, owner: &OwnerId, message: &AlertMessage) -> Result<(), NotifyError> {
        info!(
            owner = %owner,
            alert_id = %message.alert_id,
            from = %message.from_ship,
            to = %message.to_ship,
            best_price = %message.best_price,
            max_price = %message.max_price,
            route = %message.path.route(),
            "Price alert matched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::time::Duration;

    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::domain::{ShipKey, Store, UpgradeStep};

    fn path(total: Price) -> UpgradePath {
        UpgradePath {
            steps: vec![UpgradeStep {
                from: ShipKey::new("Aurora MR"),
                to: ShipKey::new("Avenger Titan"),
                store: Store::Grey,
                price: total,
                url: None,
                availability: "In stock".into(),
            }],
            total_cost: total,
            efficiency_score: dec!(60),
            risk_level: dec!(0.1),
            time_estimate: Duration::from_secs(600),
            savings: dec!(10),
        }
    }

    fn alert() -> PriceAlert {
        PriceAlert::try_new(
            OwnerId::new("1001"),
            ShipKey::new("Aurora MR"),
            ShipKey::new("Avenger Titan"),
            dec!(25),
            BTreeSet::new(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn message_carries_alert_and_best_price() {
        let alert = alert();
        let message = AlertMessage::new(&alert, path(dec!(20)));

        assert_eq!(message.alert_id, alert.id);
        assert_eq!(message.from_ship, "auroramr");
        assert_eq!(message.to_ship, "avengertitan");
        assert_eq!(message.max_price, dec!(25));
        assert_eq!(message.best_price, dec!(20));
        assert_eq!(message.path.step_count(), 1);
    }

    #[tokio::test]
    async fn log_notifier_always_delivers() {
        let message = AlertMessage::new(&alert(), path(dec!(20)));
        assert!(LogNotifier.send(&OwnerId::new("1001"), &message).await.is_ok());
    }
}
