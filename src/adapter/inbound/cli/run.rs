//! Handler for the `run` command.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;

/// Execute the run command: start the scheduler and wait for Ctrl-C.
pub async fn execute(services: Services, args: &RunArgs) -> Result<()> {
    print_startup(&services);

    if !args.no_warmup {
        services.cache.clean_expired().await;
        match services.aggregator.refresh().await {
            Ok(index) => info!(
                ships = index.ship_count(),
                listings = index.listing_count(),
                edges = index.edge_count(),
                "Initial price refresh complete"
            ),
            Err(e) => warn!(error = %e, "Initial price refresh failed, scheduler will retry"),
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Arc::clone(&services.scheduler);
    let handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!("hangar running, press Ctrl-C to stop");
    signal::ctrl_c().await?;
    info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    if let Err(e) = handle.await {
        warn!(error = %e, "Scheduler task ended abnormally");
    }

    info!("hangar stopped");
    Ok(())
}

fn print_startup(services: &Services) {
    let config = services.scheduler.config();
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Sources", services.aggregator.source_count());
    output::field("Check every", format!("{}s", config.check_interval.as_secs()));
    output::field("Sweep every", format!("{}s", config.sweep_interval.as_secs()));
    output::field("Max steps", config.max_steps);
    match services.cache.directory() {
        Some(dir) => output::field("Cache", dir.display()),
        None => output::field("Cache", "memory only"),
    }
    if services.aggregator.source_count() == 0 {
        output::warning("No price sources configured, alerts will never match");
    }
}
