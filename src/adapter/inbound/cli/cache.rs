//! Handlers for `cache` subcommands.

use serde_json::json;

use crate::adapter::inbound::cli::command::CacheCommand;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;

/// Dispatch a cache subcommand.
pub async fn execute(services: &Services, command: &CacheCommand) -> Result<()> {
    match command {
        CacheCommand::Clean => {
            let removed = services.cache.clean_expired().await;
            if output::is_json() {
                output::json_output(json!({ "removed": removed }));
            } else {
                output::success(&format!("Removed {removed} expired entries"));
            }
        }
        CacheCommand::Stats => {
            let stats = services.cache.stats();
            let directory = services
                .cache
                .directory()
                .map(|dir| dir.display().to_string());
            if output::is_json() {
                output::json_output(json!({
                    "directory": directory,
                    "memory_entries": stats.memory_entries,
                    "hits": stats.hits,
                    "misses": stats.misses,
                }));
            } else {
                output::field("Directory", directory.as_deref().unwrap_or("memory only"));
                output::field("In memory", stats.memory_entries);
                output::field("Hits", stats.hits);
                output::field("Misses", stats.misses);
            }
        }
    }
    Ok(())
}
