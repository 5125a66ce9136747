//! Discord direct-message notifier.
//!
//! Uses the bot REST API: opens (or reuses) a DM channel with the alert
//! owner, then posts the formatted message to it. Requires the `discord`
//! feature.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::format::format_alert_message;
use crate::domain::OwnerId;
use crate::error::NotifyError;
use crate::port::outbound::notifier::{AlertMessage, Notifier};

/// Default Discord REST API base.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Configuration for the Discord notifier.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    /// Bot token, sent as `Authorization: Bot <token>`.
    pub bot_token: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl DiscordConfig {
    /// Create configuration from the environment.
    ///
    /// Reads `DISCORD_BOT_TOKEN`. Returns `None` if it is missing or empty.
    #[must_use]
    pub fn from_env(api_base: &str, timeout: Duration) -> Option<Self> {
        let bot_token = std::env::var("DISCORD_BOT_TOKEN").ok()?;
        if bot_token.trim().is_empty() {
            return None;
        }
        Some(Self {
            bot_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[derive(Serialize)]
struct CreateDm<'a> {
    recipient_id: &'a str,
}

#[derive(Deserialize)]
struct Channel {
    id: String,
}

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Sends alert matches to their owners as Discord DMs.
pub struct DiscordNotifier {
    http: HttpClient,
    config: DiscordConfig,
    channels: Mutex<HashMap<OwnerId, String>>,
}

impl DiscordNotifier {
    #[must_use]
    pub fn new(config: DiscordConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self {
            http,
            config,
            channels: Mutex::new(HashMap::new()),
        }
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.config.bot_token)
    }

    async fn dm_channel(&self, owner: &OwnerId) -> Result<String, NotifyError> {
        let cached = self.channels.lock().get(owner).cloned();
        if let Some(id) = cached {
            return Ok(id);
        }

        let url = format!("{}/users/@me/channels", self.config.api_base);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&CreateDm {
                recipient_id: owner.as_str(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifyError::Delivery {
                owner: owner.clone(),
                reason: format!("opening DM channel returned {}", response.status()),
            });
        }

        let channel: Channel = response.json().await?;
        debug!(owner = %owner, channel_id = %channel.id, "Opened DM channel");
        self.channels.lock().insert(owner.clone(), channel.id.clone());
        Ok(channel.id)
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, owner: &OwnerId, message: &AlertMessage) -> Result<(), NotifyError> {
        let channel_id = self.dm_channel(owner).await?;
        let content = format_alert_message(message);

        let url = format!("{}/channels/{}/messages", self.config.api_base, channel_id);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&CreateMessage { content: &content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // A stale channel id is retried with a fresh one next time.
            if status == reqwest::StatusCode::NOT_FOUND {
                self.channels.lock().remove(owner);
            }
            return Err(NotifyError::Delivery {
                owner: owner.clone(),
                reason: format!("posting message returned {status}"),
            });
        }
        debug!(owner = %owner, alert_id = %message.alert_id, "Discord DM sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_uses_bot_scheme() {
        let config = DiscordConfig {
            bot_token: "t".into(),
            api_base: DEFAULT_API_BASE.into(),
            timeout: Duration::from_secs(5),
        };
        let notifier = DiscordNotifier::new(config);
        assert_eq!(notifier.authorization(), "Bot t");
        assert!(notifier.channels.lock().is_empty());
    }
}
