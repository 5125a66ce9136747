//! Command dispatch: configuration, logging and service wiring per run.

use super::command::{Cli, Commands};
use super::output::{self, OutputConfig};
use super::{alert, cache, check, prices, run, search};
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;
use crate::infrastructure::config::settings::Config;

/// Load configuration, initialize logging and run one command.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let mut config = Config::load(&cli.config)?;
    config.logging.level = log_level(&cli, &config.logging.level);
    config.init_logging();

    if matches!(cli.command, Commands::Check) {
        check::execute(&cli.config, &config);
        return Ok(());
    }

    let services = Services::build(&config).await?;
    match &cli.command {
        Commands::Run(args) => run::execute(services, args).await,
        Commands::Search(args) => search::execute(&services, args, config.search.max_steps).await,
        Commands::Ships(args) => search::ships(&services, args).await,
        Commands::Prices(args) => prices::execute(&services, args).await,
        Commands::Refresh => prices::refresh(&services).await,
        Commands::Alert(command) => alert::execute(&services, command).await,
        Commands::Cache(command) => cache::execute(&services, command).await,
        Commands::Check => Ok(()),
    }
}

/// One-shot commands log warnings only unless `-v` is given.
fn log_level(cli: &Cli, configured: &str) -> String {
    match cli.verbose {
        0 if matches!(cli.command, Commands::Run(_)) => configured.to_string(),
        0 => "warn".to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn one_shot_commands_default_to_warn() {
        let cli = Cli::try_parse_from(["hangar", "ships", "cutlass"]).unwrap();
        assert_eq!(log_level(&cli, "info"), "warn");
    }

    #[test]
    fn run_keeps_configured_level() {
        let cli = Cli::try_parse_from(["hangar", "run"]).unwrap();
        assert_eq!(log_level(&cli, "hangar=debug"), "hangar=debug");
        let cli = Cli::try_parse_from(["hangar", "run", "-v"]).unwrap();
        assert_eq!(log_level(&cli, "info"), "debug");
    }
}
