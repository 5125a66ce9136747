//! Composition root: builds the service graph from configuration.

use std::sync::Arc;
#[cfg(feature = "discord")]
use std::time::Duration;

use tracing::{info, warn};

use crate::adapter::outbound::catalog::MemoryCatalog;
#[cfg(feature = "discord")]
use crate::adapter::outbound::notifier::discord::{DiscordConfig, DiscordNotifier};
use crate::adapter::outbound::source::feed::HttpFeedSource;
use crate::adapter::outbound::source::fixture::StaticSource;
use crate::adapter::outbound::store::json::JsonFileAlertStore;
use crate::adapter::outbound::store::memory::MemoryAlertStore;
use crate::application::aggregator::PriceAggregator;
use crate::application::alert::scheduler::AlertScheduler;
use crate::application::alert::service::AlertService;
use crate::application::cache::service::Cache;
use crate::application::upgrade::engine::UpgradePathEngine;
use crate::application::upgrade::service::UpgradeService;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::sources::SourceSettings;
use crate::port::outbound::catalog::ShipCatalog;
use crate::port::outbound::clock::{Clock, SystemClock};
use crate::port::outbound::notifier::{LogNotifier, Notifier};
use crate::port::outbound::source::PriceSource;
use crate::port::outbound::store::AlertStore;

/// Everything a command needs, wired once.
pub struct Services {
    pub cache: Arc<Cache>,
    pub aggregator: Arc<PriceAggregator>,
    pub upgrades: Arc<UpgradeService>,
    pub alerts: Arc<AlertService>,
    pub scheduler: Arc<AlertScheduler>,
}

impl Services {
    /// Build the service graph against the wall clock.
    ///
    /// # Errors
    ///
    /// Fails if the catalog or the alert store cannot be loaded. Sources
    /// that fail to load are skipped with a warning.
    pub async fn build(config: &Config) -> Result<Self> {
        Self::build_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Build the service graph with an explicit clock.
    pub async fn build_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let cache = Arc::new(Cache::new(config.cache.to_cache_config(), Arc::clone(&clock)));
        match cache.directory() {
            Some(dir) => info!(directory = %dir.display(), "Disk cache enabled"),
            None => info!("Disk cache disabled"),
        }

        let sources = build_sources(config);
        let aggregator = Arc::new(PriceAggregator::new(
            sources,
            Arc::clone(&cache),
            Arc::clone(&clock),
            (&config.aggregator).into(),
        ));

        let catalog = build_catalog(config)?;
        let engine = UpgradePathEngine::new((&config.search).into());
        let upgrades = Arc::new(UpgradeService::new(
            catalog,
            Arc::clone(&aggregator),
            Arc::clone(&cache),
            engine,
        ));

        let store = build_store(config).await?;
        let alerts = Arc::new(AlertService::new(
            Arc::clone(&store),
            Arc::clone(&upgrades),
            Arc::clone(&clock),
            config.alerts.policy(),
        ));

        let notifier = build_notifier(config);
        let scheduler = Arc::new(AlertScheduler::new(
            store,
            Arc::clone(&upgrades),
            notifier,
            Arc::clone(&cache),
            clock,
            config.alerts.scheduler(config.search.max_steps),
        ));

        Ok(Self {
            cache,
            aggregator,
            upgrades,
            alerts,
            scheduler,
        })
    }
}

/// Build price sources in configuration order.
pub(crate) fn build_sources(config: &Config) -> Vec<Arc<dyn PriceSource>> {
    let mut sources: Vec<Arc<dyn PriceSource>> = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        match source {
            SourceSettings::Http(http) => {
                sources.push(Arc::new(HttpFeedSource::new(
                    http.name.clone(),
                    http.url.clone(),
                    http.store.clone(),
                    http.feed_settings(),
                )));
            }
            SourceSettings::File(file) => {
                match StaticSource::from_file(file.name.clone(), &file.path, &file.store) {
                    Ok(static_source) => sources.push(Arc::new(static_source)),
                    Err(e) => {
                        warn!(
                            source = %file.name,
                            error = %e,
                            "Failed to load file source, skipping"
                        );
                    }
                }
            }
        }
    }
    if sources.is_empty() {
        warn!("No price sources configured");
    } else {
        info!(count = sources.len(), "Price sources configured");
    }
    sources
}

fn build_catalog(config: &Config) -> Result<Arc<dyn ShipCatalog>> {
    let catalog = match &config.catalog {
        Some(path) => {
            let catalog = MemoryCatalog::from_file(path)?;
            info!(path = %path.display(), ships = catalog.len(), "Ship catalog loaded");
            catalog
        }
        None => {
            warn!("No ship catalog configured, every ship lookup will fail");
            MemoryCatalog::new(Vec::new())
        }
    };
    Ok(Arc::new(catalog))
}

async fn build_store(config: &Config) -> Result<Arc<dyn AlertStore>> {
    if config.alerts.persist {
        let store = JsonFileAlertStore::open(config.alerts.store_path.clone()).await?;
        info!(path = %store.path().display(), "Alert store opened");
        Ok(Arc::new(store))
    } else {
        info!("Alert store is in memory only");
        Ok(Arc::new(MemoryAlertStore::new()))
    }
}

/// Pick the delivery channel: Discord DMs when configured, otherwise the
/// log.
#[cfg(feature = "discord")]
pub(crate) fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    if !config.discord.enabled {
        info!("Discord disabled, matched alerts are logged only");
        return Arc::new(LogNotifier);
    }
    let timeout = Duration::from_millis(config.discord.timeout_ms);
    match DiscordConfig::from_env(&config.discord.api_base, timeout) {
        Some(discord) => {
            info!("Discord notifier enabled");
            Arc::new(DiscordNotifier::new(discord))
        }
        None => {
            warn!("Discord enabled but DISCORD_BOT_TOKEN not set, matched alerts are logged only");
            Arc::new(LogNotifier)
        }
    }
}

#[cfg(not(feature = "discord"))]
pub(crate) fn build_notifier(_config: &Config) -> Arc<dyn Notifier> {
    Arc::new(LogNotifier)
}
