//! Handler for the `check` command.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::sources::SourceSettings;

/// Print a summary of an already validated configuration.
pub fn execute(path: &Path, config: &Config) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::success(&format!("{} is valid", path.display()));

    output::section("Sources");
    if config.sources.is_empty() {
        output::warning("No price sources configured");
    }
    for source in &config.sources {
        match source {
            SourceSettings::Http(http) => {
                output::field(&http.name, format!("{} ({})", http.url, http.store));
            }
            SourceSettings::File(file) => {
                let missing = if file.path.exists() { "" } else { ", missing" };
                output::field(
                    &file.name,
                    format!("{} ({}{missing})", file.path.display(), file.store),
                );
            }
        }
    }

    output::section("Alerts");
    let store = if config.alerts.persist {
        config.alerts.store_path.display().to_string()
    } else {
        "memory only".to_string()
    };
    output::field("Store", store);
    output::field("Per owner", config.alerts.max_active_per_owner);
    output::field("Check every", format!("{}s", config.alerts.check_interval_secs));

    output::section("Discord");
    let token_set = std::env::var("DISCORD_BOT_TOKEN").is_ok_and(|t| !t.trim().is_empty());
    match (config.discord.enabled, token_set) {
        (false, _) => output::note("disabled"),
        (true, true) => output::success("DISCORD_BOT_TOKEN found"),
        (true, false) => {
            output::warning("Discord enabled but DISCORD_BOT_TOKEN is not set");
            output::hint("set DISCORD_BOT_TOKEN in the environment or a .env file");
        }
    }

    if config.catalog.is_none() {
        output::warning("No ship catalog configured, ship lookups will fail");
    }
}
