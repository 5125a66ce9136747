//! HTTP JSON feed source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::dto::FeedDocument;
use crate::domain::{PriceListing, Store, UpgradeEdge};
use crate::error::SourceError;
use crate::port::outbound::source::PriceSource;

/// Connection and retry settings for [`HttpFeedSource`].
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_backoff: Duration,
    /// How long one downloaded document serves both listings and offers.
    pub reuse_window: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            retry_max_attempts: 3,
            retry_backoff: Duration::from_millis(500),
            reuse_window: Duration::from_secs(30),
        }
    }
}

/// A marketplace exposed as a JSON feed over HTTP.
pub struct HttpFeedSource {
    name: String,
    url: String,
    store: Store,
    http: HttpClient,
    settings: FeedSettings,
    last: Mutex<Option<(Instant, Arc<FeedDocument>)>>,
}

impl HttpFeedSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        store: Store,
        settings: FeedSettings,
    ) -> Self {
        let http = HttpClient::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(concat!("hangar/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            name: name.into(),
            url: url.into(),
            store,
            http,
            settings,
            last: Mutex::new(None),
        }
    }

    /// The feed document, downloaded at most once per reuse window.
    async fn document(&self) -> Result<Arc<FeedDocument>, SourceError> {
        let mut last = self.last.lock().await;
        if let Some((fetched_at, doc)) = last.as_ref() {
            if fetched_at.elapsed() < self.settings.reuse_window {
                return Ok(Arc::clone(doc));
            }
        }

        let doc = Arc::new(self.get_with_retry().await?);
        *last = Some((Instant::now(), Arc::clone(&doc)));
        Ok(doc)
    }

    async fn get_with_retry(&self) -> Result<FeedDocument, SourceError> {
        let mut attempt = 0;
        let max_attempts = self.settings.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            info!(source = %self.name, url = %self.url, attempt, "Fetching price feed");

            let response = match self.http.get(&self.url).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(self.unavailable(&err));
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = response
                .error_for_status()
                .map_err(|err| self.unavailable(&err))?;

            match response.json::<FeedDocument>().await {
                Ok(doc) => {
                    debug!(
                        source = %self.name,
                        listings = doc.listings.len(),
                        upgrades = doc.upgrades.len(),
                        "Fetched price feed"
                    );
                    return Ok(doc);
                }
                Err(err) if err.is_decode() => {
                    return Err(SourceError::Malformed {
                        source_name: self.name.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(self.unavailable(&err));
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            source = %self.name,
            attempt,
            max_attempts,
            error = %err,
            "Feed request failed, retrying"
        );
        if !self.settings.retry_backoff.is_zero() {
            sleep(self.settings.retry_backoff * attempt).await;
        }
    }

    fn unavailable(&self, err: &reqwest::Error) -> SourceError {
        SourceError::Unavailable {
            source_name: self.name.clone(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl PriceSource for HttpFeedSource {
    async fn fetch_listings(&self) -> Result<Vec<PriceListing>, SourceError> {
        let doc = self.document().await?;
        Ok(doc.listings(&self.name, &self.store, Utc::now()))
    }

    async fn fetch_upgrade_edges(&self) -> Result<Vec<UpgradeEdge>, SourceError> {
        let doc = self.document().await?;
        Ok(doc.upgrades(&self.name, &self.store, Utc::now()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
