//! Command-line interface definitions.
//!
//! Defines the CLI structure for hangar using `clap`: a long-running bot
//! command plus one-shot commands for searching, alert management and
//! cache maintenance.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// Star Citizen upgrade path search and price alerts
#[derive(Parser, Debug)]
#[command(name = "hangar")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the alert scheduler until interrupted
    Run(RunArgs),

    /// Find upgrade paths between two ships
    Search(SearchArgs),

    /// Look up ships by name
    Ships(ShipsArgs),

    /// Show current listings and the lowest recorded price for a ship
    Prices(PricesArgs),

    /// Refresh prices from every source and report per-source results
    Refresh,

    /// Manage price alerts
    #[command(subcommand)]
    Alert(AlertCommand),

    /// Manage the on-disk cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Validate the configuration file
    Check,
}

/// Arguments for `hangar run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Skip the cache cleanup and price refresh done at startup
    #[arg(long)]
    pub no_warmup: bool,
}

/// Arguments for `hangar search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Ship you own
    pub from: String,

    /// Ship you want
    pub to: String,

    /// Maximum upgrades in one path
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Only use these stores (repeatable)
    #[arg(long = "store")]
    pub stores: Vec<String>,

    /// Number of ranked paths to print
    #[arg(long, default_value = "5")]
    pub limit: usize,
}

/// Arguments for `hangar ships`.
#[derive(Args, Debug)]
pub struct ShipsArgs {
    /// Full or partial ship name
    pub query: String,

    /// Maximum number of matches
    #[arg(long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for `hangar prices`.
#[derive(Args, Debug)]
pub struct PricesArgs {
    /// Ship name
    pub ship: String,
}

/// Subcommands for `hangar alert`.
#[derive(Subcommand, Debug)]
pub enum AlertCommand {
    /// Create a price alert
    Add(AlertAddArgs),
    /// List active alerts of an owner
    List(AlertOwnerArgs),
    /// Remove an alert
    Remove(AlertRemoveArgs),
    /// Run one alert check pass now
    Check,
}

/// Arguments for `hangar alert add`.
#[derive(Args, Debug)]
pub struct AlertAddArgs {
    /// Discord user id that owns the alert
    #[arg(long)]
    pub owner: String,

    /// Ship you own
    pub from: String,

    /// Ship you want
    pub to: String,

    /// Trigger when the cheapest path costs at most this much (USD)
    pub max_price: Decimal,

    /// Only watch these stores (repeatable, default all)
    #[arg(long = "store")]
    pub stores: Vec<String>,
}

/// Arguments for `hangar alert list`.
#[derive(Args, Debug)]
pub struct AlertOwnerArgs {
    /// Discord user id
    #[arg(long)]
    pub owner: String,
}

/// Arguments for `hangar alert remove`.
#[derive(Args, Debug)]
pub struct AlertRemoveArgs {
    /// Discord user id
    #[arg(long)]
    pub owner: String,

    /// Alert id as printed by `alert add` or `alert list`
    pub id: String,
}

/// Subcommands for `hangar cache`.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Delete expired entries from memory and disk
    Clean,
    /// Show cache location and counters
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from(["hangar", "run"]).unwrap();
        assert!(matches!(cli.command, Commands::Run(ref args) if !args.no_warmup));
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["hangar", "refresh", "--config", "bot.toml", "-vv"]).unwrap();
        assert!(matches!(cli.command, Commands::Refresh));
        assert_eq!(cli.config, PathBuf::from("bot.toml"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_search_with_stores() {
        let cli = Cli::try_parse_from([
            "hangar",
            "search",
            "Aurora MR",
            "Cutlass Black",
            "--store",
            "rsi",
            "--store",
            "star-hangar",
            "--max-steps",
            "2",
        ])
        .unwrap();
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.from, "Aurora MR");
        assert_eq!(args.to, "Cutlass Black");
        assert_eq!(args.stores, vec!["rsi", "star-hangar"]);
        assert_eq!(args.max_steps, Some(2));
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn test_parse_alert_add() {
        let cli = Cli::try_parse_from([
            "hangar", "alert", "add", "--owner", "1234", "Avenger Titan", "Cutlass Black", "45.50",
        ])
        .unwrap();
        let Commands::Alert(AlertCommand::Add(args)) = cli.command else {
            panic!("expected alert add");
        };
        assert_eq!(args.owner, "1234");
        assert_eq!(args.max_price, dec!(45.50));
        assert!(args.stores.is_empty());
    }

    #[test]
    fn test_alert_remove_requires_owner() {
        assert!(Cli::try_parse_from(["hangar", "alert", "remove", "abc"]).is_err());
    }

    #[test]
    fn test_parse_cache_clean() {
        let cli = Cli::try_parse_from(["hangar", "cache", "clean"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache(CacheCommand::Clean)));
    }
}
