//! Periodic alert checks.
//!
//! Each tick re-evaluates the alerts that are due, one at a time with a
//! short pause between checks. A matching alert is deactivated and saved
//! before its owner is notified, so an alert can trigger at most once even
//! if delivery fails or the process dies mid-tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::application::cache::service::Cache;
use crate::application::upgrade::engine::DEFAULT_MAX_STEPS;
use crate::application::upgrade::service::UpgradeService;
use crate::domain::PriceAlert;
use crate::error::Result;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::notifier::{AlertMessage, Notifier};
use crate::port::outbound::store::AlertStore;

/// Scheduler timing.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often due alerts are checked, and how old a check must be
    /// before an alert is due again.
    pub check_interval: Duration,
    /// How often every active alert is force-checked and housekeeping runs.
    pub sweep_interval: Duration,
    /// Pause between consecutive alert checks.
    pub throttle: Duration,
    /// Step limit for alert searches.
    pub max_steps: usize,
    /// Age after which settled alerts are deleted by the sweep.
    pub retention: chrono::Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
            throttle: Duration::from_secs(2),
            max_steps: DEFAULT_MAX_STEPS,
            retention: chrono::Duration::days(30),
        }
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub checked: usize,
    pub triggered: usize,
    pub failed: usize,
    pub undelivered: usize,
}

enum Outcome {
    Pending,
    Triggered { delivered: bool },
    Skipped,
}

/// Checks alerts against fresh prices and notifies owners on a match.
pub struct AlertScheduler {
    store: Arc<dyn AlertStore>,
    upgrades: Arc<UpgradeService>,
    notifier: Arc<dyn Notifier>,
    cache: Arc<Cache>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    // Ticks and sweeps never overlap.
    pass: Mutex<()>,
}

impl AlertScheduler {
    pub fn new(
        store: Arc<dyn AlertStore>,
        upgrades: Arc<UpgradeService>,
        notifier: Arc<dyn Notifier>,
        cache: Arc<Cache>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            upgrades,
            notifier,
            cache,
            clock,
            config,
            pass: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Check every active alert whose last check is older than the check
    /// interval.
    pub async fn tick(&self) -> Result<TickReport> {
        self.pass(false).await
    }

    /// Check every active alert, then prune settled alerts and expired
    /// cache entries.
    pub async fn sweep(&self) -> Result<TickReport> {
        let report = self.pass(true).await?;

        let cutoff = self.clock.now() - self.config.retention;
        match self.store.prune_inactive(cutoff).await {
            Ok(pruned) if pruned > 0 => info!(pruned, "Pruned settled alerts"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Alert pruning failed"),
        }
        self.cache.clean_expired().await;
        Ok(report)
    }

    async fn pass(&self, force: bool) -> Result<TickReport> {
        let _guard = self.pass.lock().await;
        let started = self.clock.now();
        let due_after = chrono::Duration::milliseconds(
            i64::try_from(self.config.check_interval.as_millis()).unwrap_or(i64::MAX),
        );

        let due: Vec<PriceAlert> = self
            .store
            .list_active()
            .await?
            .into_iter()
            .filter(|alert| force || alert.is_due(started, due_after))
            .collect();
        debug!(due = due.len(), force, "Alert pass started");

        let mut report = TickReport::default();
        for (i, alert) in due.into_iter().enumerate() {
            if i > 0 && !self.config.throttle.is_zero() {
                tokio::time::sleep(self.config.throttle).await;
            }
            match self.check(alert, started).await {
                Ok(Outcome::Pending) => report.checked += 1,
                Ok(Outcome::Triggered { delivered }) => {
                    report.checked += 1;
                    report.triggered += 1;
                    if !delivered {
                        report.undelivered += 1;
                    }
                }
                Ok(Outcome::Skipped) => {}
                Err(e) => {
                    report.failed += 1;
                    warn!(error = %e, "Alert check failed");
                }
            }
        }

        info!(
            checked = report.checked,
            triggered = report.triggered,
            failed = report.failed,
            "Alert pass complete"
        );
        Ok(report)
    }

    /// Evaluate one alert. `now` is the pass start, used as the check stamp
    /// so throttling does not push alerts past the next pass.
    async fn check(&self, alert: PriceAlert, now: DateTime<Utc>) -> Result<Outcome> {
        let search = self
            .upgrades
            .search_for_alert(&alert, self.config.max_steps)
            .await;

        // The owner may have removed the alert while prices were fetched.
        let Some(mut current) = self.store.get(&alert.id).await? else {
            return Ok(Outcome::Skipped);
        };
        if !current.active {
            return Ok(Outcome::Skipped);
        }
        current.mark_checked(now);

        let outcome = match search {
            Ok(outcome) => outcome,
            Err(e) => {
                self.store.update(&current).await?;
                return Err(e);
            }
        };

        let matched = outcome
            .cheapest()
            .filter(|path| current.matches(path.total_cost))
            .cloned();
        let Some(path) = matched else {
            self.store.update(&current).await?;
            debug!(
                alert_id = %current.id,
                best_price = ?outcome.best_price(),
                max_price = %current.max_price,
                "Alert not matched"
            );
            return Ok(Outcome::Pending);
        };

        current.trigger(now);
        if !self.store.update(&current).await? {
            debug!(alert_id = %current.id, "Alert removed before it could trigger");
            return Ok(Outcome::Skipped);
        }
        info!(
            alert_id = %current.id,
            owner = %current.owner_id,
            best_price = %path.total_cost,
            max_price = %current.max_price,
            "Alert triggered"
        );

        let message = AlertMessage::new(&current, path);
        let delivered = match self.notifier.send(&current.owner_id, &message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(alert_id = %current.id, error = %e, "Alert notification failed");
                false
            }
        };
        Ok(Outcome::Triggered { delivered })
    }

    /// Run passes on the check interval and sweeps on the sweep interval
    /// until `shutdown` turns true.
    ///
    /// Each pass runs in its own task so a panic inside one is logged and
    /// the loop keeps going.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut checks = interval(self.config.check_interval);
        checks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sweeps = interval_at(
            Instant::now() + self.config.sweep_interval,
            self.config.sweep_interval,
        );
        sweeps.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            check_interval_secs = self.config.check_interval.as_secs(),
            sweep_interval_secs = self.config.sweep_interval.as_secs(),
            "Alert scheduler started"
        );

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    match result {
                        Ok(()) => {
                            if *shutdown.borrow() {
                                info!("Shutdown signal received");
                                break;
                            }
                        }
                        Err(_) => {
                            info!("Shutdown channel closed");
                            break;
                        }
                    }
                }
                _ = checks.tick() => {
                    let this = Arc::clone(&self);
                    log_pass("tick", tokio::spawn(async move { this.tick().await }).await);
                }
                _ = sweeps.tick() => {
                    let this = Arc::clone(&self);
                    log_pass("sweep", tokio::spawn(async move { this.sweep().await }).await);
                }
            }
        }

        info!("Alert scheduler stopped");
    }
}

fn log_pass(kind: &str, joined: std::result::Result<Result<TickReport>, tokio::task::JoinError>) {
    match joined {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => error!(kind, error = %e, "Alert pass failed"),
        Err(e) => error!(kind, error = %e, "Alert pass panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use rust_decimal_macros::dec;

    use crate::adapter::outbound::catalog::MemoryCatalog;
    use crate::adapter::outbound::store::memory::MemoryAlertStore;
    use crate::application::aggregator::{AggregatorConfig, PriceAggregator};
    use crate::application::cache::service::CacheConfig;
    use crate::application::upgrade::engine::UpgradePathEngine;
    use crate::domain::{OwnerId, Ship, ShipKey, Store};
    use crate::port::outbound::source::PriceSource;
    use crate::testkit::clock::ManualClock;
    use crate::testkit::domain::edge;
    use crate::testkit::notifier::{FailingNotifier, RecordingNotifier};
    use crate::testkit::source::ScriptedSource;

    struct Fixture {
        scheduler: AlertScheduler,
        store: Arc<MemoryAlertStore>,
        clock: Arc<ManualClock>,
        source: Arc<ScriptedSource>,
    }

    fn fixture(notifier: Arc<dyn Notifier>) -> Fixture {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(Cache::new(CacheConfig::memory_only(), clock.clone()));
        let source = Arc::new(ScriptedSource::new("grey"));
        let sources: Vec<Arc<dyn PriceSource>> = vec![source.clone()];
        let aggregator = Arc::new(PriceAggregator::new(
            sources,
            cache.clone(),
            clock.clone(),
            AggregatorConfig::default(),
        ));
        let catalog = Arc::new(MemoryCatalog::new(vec![Ship::new("A"), Ship::new("B")]));
        let upgrades = Arc::new(UpgradeService::new(
            catalog,
            aggregator,
            cache.clone(),
            UpgradePathEngine::default(),
        ));
        let store = Arc::new(MemoryAlertStore::new());
        let config = SchedulerConfig {
            throttle: Duration::ZERO,
            ..SchedulerConfig::default()
        };
        let scheduler = AlertScheduler::new(
            store.clone(),
            upgrades,
            notifier,
            cache,
            clock.clone(),
            config,
        );
        Fixture {
            scheduler,
            store,
            clock,
            source,
        }
    }

    async fn add_alert(fixture: &Fixture, max_price: rust_decimal::Decimal) -> PriceAlert {
        let alert = PriceAlert::try_new(
            OwnerId::new("42"),
            ShipKey::new("A"),
            ShipKey::new("B"),
            max_price,
            BTreeSet::new(),
            fixture.clock.now(),
        )
        .unwrap();
        fixture.store.insert(&alert).await.unwrap();
        alert
    }

    #[tokio::test]
    async fn unmatched_alert_stays_active_and_is_stamped() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fixture = fixture(notifier.clone());
        fixture.source.replace(vec![edge("A", "B", Store::Grey, dec!(120))]);
        let alert = add_alert(&fixture, dec!(100)).await;

        let report = fixture.scheduler.tick().await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.triggered, 0);

        let stored = fixture.store.get(&alert.id).await.unwrap().unwrap();
        assert!(stored.active);
        assert_eq!(stored.last_checked_at, Some(fixture.clock.now()));
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn alert_triggers_exactly_once() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fixture = fixture(notifier.clone());
        fixture.source.replace(vec![edge("A", "B", Store::Grey, dec!(90))]);
        let alert = add_alert(&fixture, dec!(100)).await;

        let first = fixture.scheduler.tick().await.unwrap();
        fixture.clock.advance(chrono::Duration::hours(1));
        let second = fixture.scheduler.tick().await.unwrap();

        assert_eq!(first.triggered, 1);
        assert_eq!(second.checked, 0);
        assert_eq!(notifier.len(), 1);
        let (owner, message) = &notifier.sent()[0];
        assert_eq!(owner.as_str(), "42");
        assert_eq!(message.best_price, dec!(90));

        let stored = fixture.store.get(&alert.id).await.unwrap().unwrap();
        assert!(!stored.active);
        assert!(stored.triggered_at.is_some());
    }

    #[tokio::test]
    async fn cheapest_path_triggers_even_when_ranked_last() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fixture = fixture(notifier.clone());
        let mut edges = Vec::new();
        for i in 0..11 {
            let mid = format!("M{i}");
            edges.push(edge("A", &mid, Store::Grey, dec!(55)));
            edges.push(edge(&mid, "B", Store::Grey, dec!(55)));
        }
        edges.push(edge("A", "X", Store::Grey, dec!(34)));
        edges.push(edge("X", "Y", Store::Grey, dec!(34)));
        edges.push(edge("Y", "B", Store::Grey, dec!(34)));
        fixture.source.replace(edges);
        let alert = add_alert(&fixture, dec!(105)).await;

        let report = fixture.scheduler.tick().await.unwrap();

        assert_eq!(report.triggered, 1);
        assert_eq!(notifier.sent()[0].1.best_price, dec!(102));
        assert!(!fixture.store.get(&alert.id).await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn recently_checked_alerts_are_not_due() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fixture = fixture(notifier.clone());
        fixture.source.replace(vec![edge("A", "B", Store::Grey, dec!(120))]);
        add_alert(&fixture, dec!(100)).await;

        fixture.scheduler.tick().await.unwrap();
        fixture.clock.advance(chrono::Duration::minutes(10));
        assert_eq!(fixture.scheduler.tick().await.unwrap().checked, 0);

        let swept = fixture.scheduler.sweep().await.unwrap();
        assert_eq!(swept.checked, 1);
    }

    #[tokio::test]
    async fn delivery_failure_does_not_revert_trigger() {
        let notifier = Arc::new(FailingNotifier::new());
        let fixture = fixture(notifier.clone());
        fixture.source.replace(vec![edge("A", "B", Store::Grey, dec!(50))]);
        let alert = add_alert(&fixture, dec!(100)).await;

        let report = fixture.scheduler.tick().await.unwrap();
        assert_eq!(report.triggered, 1);
        assert_eq!(report.undelivered, 1);
        assert_eq!(notifier.attempts(), 1);

        let stored = fixture.store.get(&alert.id).await.unwrap().unwrap();
        assert!(!stored.active);
    }

    #[tokio::test]
    async fn failing_check_does_not_stop_the_pass() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fixture = fixture(notifier.clone());
        fixture.source.replace(vec![edge("A", "B", Store::Grey, dec!(50))]);

        let orphan = PriceAlert::try_new(
            OwnerId::new("7"),
            ShipKey::new("Ghost"),
            ShipKey::new("B"),
            dec!(100),
            BTreeSet::new(),
            fixture.clock.now(),
        )
        .unwrap();
        fixture.store.insert(&orphan).await.unwrap();
        add_alert(&fixture, dec!(100)).await;

        let report = fixture.scheduler.tick().await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.triggered, 1);
        assert_eq!(notifier.len(), 1);
    }

    #[tokio::test]
    async fn sweep_prunes_settled_alerts() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fixture = fixture(notifier);
        fixture.source.replace(vec![edge("A", "B", Store::Grey, dec!(50))]);
        let alert = add_alert(&fixture, dec!(100)).await;
        fixture.scheduler.tick().await.unwrap();

        fixture.clock.advance(chrono::Duration::days(31));
        fixture.scheduler.sweep().await.unwrap();
        assert!(fixture.store.get(&alert.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fixture = fixture(notifier);
        let scheduler = Arc::new(fixture.scheduler);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(Arc::clone(&scheduler).run(rx));
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
