//! Alert lifecycle against a JSON store: create, check, trigger, reopen.

mod support;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hangar::adapter::outbound::catalog::MemoryCatalog;
use hangar::adapter::outbound::store::json::JsonFileAlertStore;
use hangar::application::aggregator::{AggregatorConfig, PriceAggregator};
use hangar::application::alert::scheduler::{AlertScheduler, SchedulerConfig};
use hangar::application::alert::service::{AlertPolicy, AlertService};
use hangar::application::cache::service::{Cache, CacheConfig};
use hangar::application::upgrade::engine::UpgradePathEngine;
use hangar::application::upgrade::service::UpgradeService;
use hangar::domain::{OwnerId, Ship, Store};
use hangar::error::{AlertError, Error, SearchError};
use hangar::port::outbound::notifier::Notifier;
use hangar::port::outbound::source::PriceSource;
use hangar::port::outbound::store::AlertStore;
use hangar::testkit::clock::ManualClock;
use hangar::testkit::domain::{edge, priced_ship};
use hangar::testkit::notifier::{FailingNotifier, RecordingNotifier};
use hangar::testkit::source::ScriptedSource;
use rust_decimal_macros::dec;
use support::fixtures::Workspace;

struct Bot {
    alerts: AlertService,
    scheduler: AlertScheduler,
    store: Arc<JsonFileAlertStore>,
    source: Arc<ScriptedSource>,
    clock: Arc<ManualClock>,
}

async fn bot(store_path: &Path, notifier: Arc<dyn Notifier>, max_active: usize) -> Bot {
    let clock = Arc::new(ManualClock::default());
    let cache = Arc::new(Cache::new(CacheConfig::memory_only(), clock.clone()));
    let source = Arc::new(ScriptedSource::new("grey").with_edges(vec![
        edge("Aurora MR", "Avenger Titan", Store::Grey, dec!(20)),
        edge("Avenger Titan", "Cutlass Black", Store::Grey, dec!(40)),
        edge("Aurora MR", "Cutlass Black", Store::Rsi, dec!(75)),
    ]));
    let sources: Vec<Arc<dyn PriceSource>> = vec![source.clone()];
    let aggregator = Arc::new(PriceAggregator::new(
        sources,
        cache.clone(),
        clock.clone(),
        AggregatorConfig::default(),
    ));
    let catalog = Arc::new(MemoryCatalog::new(vec![
        priced_ship("Aurora MR", dec!(25)),
        priced_ship("Avenger Titan", dec!(55)),
        priced_ship("Cutlass Black", dec!(100)),
        Ship::new("Carrack"),
    ]));
    let upgrades = Arc::new(UpgradeService::new(
        catalog,
        aggregator,
        cache.clone(),
        UpgradePathEngine::default(),
    ));
    let store = Arc::new(JsonFileAlertStore::open(store_path).await.unwrap());

    let alerts = AlertService::new(
        store.clone(),
        upgrades.clone(),
        clock.clone(),
        AlertPolicy {
            max_active_per_owner: max_active,
            ..AlertPolicy::default()
        },
    );
    let scheduler = AlertScheduler::new(
        store.clone(),
        upgrades,
        notifier,
        cache,
        clock.clone(),
        SchedulerConfig {
            throttle: Duration::ZERO,
            ..SchedulerConfig::default()
        },
    );
    Bot {
        alerts,
        scheduler,
        store,
        source,
        clock,
    }
}

#[tokio::test]
async fn matching_alert_notifies_once_and_persists() {
    let ws = Workspace::new();
    let path = ws.path("alerts.json");
    let notifier = Arc::new(RecordingNotifier::new());
    let bot = bot(&path, notifier.clone(), 10).await;
    let owner = OwnerId::new("1001");

    let id = bot
        .alerts
        .create_alert(&owner, "aurora mr", "Cutlass Black", dec!(65), BTreeSet::new())
        .await
        .unwrap();

    let first = bot.scheduler.tick().await.unwrap();
    bot.clock.advance(chrono::Duration::hours(1));
    let second = bot.scheduler.sweep().await.unwrap();

    assert_eq!(first.triggered, 1);
    assert_eq!(second.checked, 0);
    assert_eq!(notifier.len(), 1);
    let (to, message) = &notifier.sent()[0];
    assert_eq!(to, &owner);
    assert_eq!(message.best_price, dec!(60));

    let reopened = JsonFileAlertStore::open(&path).await.unwrap();
    let stored = reopened.get(&id).await.unwrap().unwrap();
    assert!(!stored.active);
    assert!(stored.triggered_at.is_some());
    assert!(bot.alerts.list_alerts(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn price_drop_triggers_a_waiting_alert() {
    let ws = Workspace::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let bot = bot(&ws.path("alerts.json"), notifier.clone(), 10).await;
    let owner = OwnerId::new("1001");

    bot.alerts
        .create_alert(&owner, "Aurora MR", "Cutlass Black", dec!(50), BTreeSet::new())
        .await
        .unwrap();
    assert_eq!(bot.scheduler.tick().await.unwrap().triggered, 0);

    bot.source.replace(vec![edge("Aurora MR", "Cutlass Black", Store::Grey, dec!(45))]);
    // Past both the check interval and the index refresh interval.
    bot.clock.advance(chrono::Duration::minutes(31));
    let report = bot.scheduler.tick().await.unwrap();

    assert_eq!(report.triggered, 1);
    assert_eq!(notifier.sent()[0].1.best_price, dec!(45));
}

#[tokio::test]
async fn per_owner_cap_counts_only_active_alerts() {
    let ws = Workspace::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let bot = bot(&ws.path("alerts.json"), notifier, 2).await;
    let owner = OwnerId::new("1001");

    let first = bot
        .alerts
        .create_alert(&owner, "Aurora MR", "Cutlass Black", dec!(10), BTreeSet::new())
        .await
        .unwrap();
    bot.alerts
        .create_alert(&owner, "Aurora MR", "Avenger Titan", dec!(10), BTreeSet::new())
        .await
        .unwrap();

    let err = bot
        .alerts
        .create_alert(&owner, "Avenger Titan", "Cutlass Black", dec!(10), BTreeSet::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Alert(AlertError::LimitExceeded { limit: 2, .. })));

    let other = OwnerId::new("2002");
    assert!(bot
        .alerts
        .create_alert(&other, "Avenger Titan", "Cutlass Black", dec!(10), BTreeSet::new())
        .await
        .is_ok());

    bot.alerts.remove_alert(&owner, &first).await.unwrap();
    assert!(bot
        .alerts
        .create_alert(&owner, "Avenger Titan", "Cutlass Black", dec!(10), BTreeSet::new())
        .await
        .is_ok());
}

#[tokio::test]
async fn failed_delivery_does_not_rearm_the_alert() {
    let ws = Workspace::new();
    let notifier = Arc::new(FailingNotifier::new());
    let bot = bot(&ws.path("alerts.json"), notifier.clone(), 10).await;
    let owner = OwnerId::new("1001");

    let id = bot
        .alerts
        .create_alert(&owner, "Aurora MR", "Cutlass Black", dec!(100), BTreeSet::new())
        .await
        .unwrap();

    let report = bot.scheduler.tick().await.unwrap();
    assert_eq!(report.triggered, 1);
    assert_eq!(report.undelivered, 1);

    bot.clock.advance(chrono::Duration::hours(2));
    bot.scheduler.sweep().await.unwrap();
    assert_eq!(notifier.attempts(), 1);
    assert!(!bot.store.get(&id).await.unwrap().unwrap().active);
}

#[tokio::test]
async fn store_filter_limits_matching_offers() {
    let ws = Workspace::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let bot = bot(&ws.path("alerts.json"), notifier.clone(), 10).await;
    let owner = OwnerId::new("1001");

    bot.alerts
        .create_alert(&owner, "Aurora MR", "Cutlass Black", dec!(70), BTreeSet::from([Store::Rsi]))
        .await
        .unwrap();

    let report = bot.scheduler.tick().await.unwrap();
    assert_eq!(report.checked, 1);
    assert_eq!(report.triggered, 0);
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn removed_alerts_are_never_checked() {
    let ws = Workspace::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let bot = bot(&ws.path("alerts.json"), notifier.clone(), 10).await;
    let owner = OwnerId::new("1001");

    let id = bot
        .alerts
        .create_alert(&owner, "Aurora MR", "Cutlass Black", dec!(100), BTreeSet::new())
        .await
        .unwrap();
    bot.alerts.remove_alert(&owner, &id).await.unwrap();

    let report = bot.scheduler.tick().await.unwrap();
    assert_eq!(report.checked, 0);
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn alerts_reject_unknown_and_identical_ships() {
    let ws = Workspace::new();
    let bot = bot(&ws.path("alerts.json"), Arc::new(RecordingNotifier::new()), 10).await;
    let owner = OwnerId::new("1001");

    let unknown = bot
        .alerts
        .create_alert(&owner, "Aurora MR", "Idris-P", dec!(100), BTreeSet::new())
        .await
        .unwrap_err();
    assert!(matches!(unknown, Error::Search(SearchError::ShipNotFound { .. })));

    let same = bot
        .alerts
        .create_alert(&owner, "Aurora MR", "aurora-mr", dec!(100), BTreeSet::new())
        .await
        .unwrap_err();
    assert!(matches!(same, Error::Search(SearchError::SameShip { .. })));

    let negative = bot
        .alerts
        .create_alert(&owner, "Aurora MR", "Carrack", dec!(-1), BTreeSet::new())
        .await
        .unwrap_err();
    assert!(matches!(negative, Error::Alert(AlertError::InvalidPrice { .. })));
}

#[tokio::test]
async fn running_scheduler_sees_alerts_managed_by_another_process() {
    let ws = Workspace::new();
    let path = ws.path("alerts.json");
    let notifier = Arc::new(RecordingNotifier::new());
    let running = bot(&path, notifier.clone(), 10).await;
    let cli = bot(&path, Arc::new(RecordingNotifier::new()), 10).await;
    let owner = OwnerId::new("1001");

    let watched = running
        .alerts
        .create_alert(&owner, "Aurora MR", "Cutlass Black", dec!(10), BTreeSet::new())
        .await
        .unwrap();
    let added = cli
        .alerts
        .create_alert(&owner, "Aurora MR", "Cutlass Black", dec!(65), BTreeSet::new())
        .await
        .unwrap();

    let report = running.scheduler.tick().await.unwrap();
    assert_eq!(report.checked, 2);
    assert_eq!(report.triggered, 1);
    assert_eq!(notifier.sent()[0].1.alert_id, added);

    let removed = cli
        .alerts
        .create_alert(&owner, "Aurora MR", "Avenger Titan", dec!(25), BTreeSet::new())
        .await
        .unwrap();
    cli.alerts.remove_alert(&owner, &removed).await.unwrap();
    running.clock.advance(chrono::Duration::hours(1));
    let report = running.scheduler.tick().await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(notifier.len(), 1);
    let reopened = JsonFileAlertStore::open(&path).await.unwrap();
    assert!(reopened.get(&watched).await.unwrap().unwrap().active);
    assert!(!reopened.get(&removed).await.unwrap().unwrap().active);
}
