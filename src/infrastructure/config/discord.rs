//! Discord notifier configuration.

use serde::Deserialize;

/// `[discord]` section. The bot token is read from `DISCORD_BOT_TOKEN`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_enabled() -> bool {
    true
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_base: default_api_base(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
