//! Handlers for `alert` subcommands.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::{
    AlertAddArgs, AlertCommand, AlertOwnerArgs, AlertRemoveArgs,
};
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::search::parse_stores;
use crate::domain::error::DomainError;
use crate::domain::{AlertId, OwnerId, PriceAlert};
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Max Price")]
    max_price: String,
    #[tabled(rename = "Stores")]
    stores: String,
    #[tabled(rename = "Last Checked")]
    last_checked: String,
}

impl From<&PriceAlert> for AlertRow {
    fn from(alert: &PriceAlert) -> Self {
        Self {
            id: alert.id.to_string(),
            from: alert.from_ship.to_string(),
            to: alert.to_ship.to_string(),
            max_price: output::money(alert.max_price),
            stores: alert
                .stores
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            last_checked: alert
                .last_checked_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".into()),
        }
    }
}

/// Dispatch an alert subcommand.
pub async fn execute(services: &Services, command: &AlertCommand) -> Result<()> {
    match command {
        AlertCommand::Add(args) => add(services, args).await,
        AlertCommand::List(args) => list(services, args).await,
        AlertCommand::Remove(args) => remove(services, args).await,
        AlertCommand::Check => check(services).await,
    }
}

async fn add(services: &Services, args: &AlertAddArgs) -> Result<()> {
    let owner = OwnerId::new(args.owner.trim());
    let id = services
        .alerts
        .create_alert(&owner, &args.from, &args.to, args.max_price, parse_stores(&args.stores))
        .await?;

    if output::is_json() {
        output::json_output(json!({ "id": id.to_string() }));
    } else {
        output::success(&format!("Alert {} created", output::highlight(id)));
        output::hint(
            "checks run while `hangar run` is active, or on demand with `hangar alert check`",
        );
    }
    Ok(())
}

async fn list(services: &Services, args: &AlertOwnerArgs) -> Result<()> {
    let owner = OwnerId::new(args.owner.trim());
    let alerts = services.alerts.list_alerts(&owner).await?;

    if output::is_json() {
        output::json_output(serde_json::to_value(&alerts)?);
        return Ok(());
    }
    if alerts.is_empty() {
        output::note("No active alerts");
        return Ok(());
    }

    let limit = services.alerts.policy().max_active_per_owner;
    output::section(&format!("Active alerts ({}/{limit})", alerts.len()));
    let rows: Vec<AlertRow> = alerts.iter().map(AlertRow::from).collect();
    output::table(rows);
    Ok(())
}

async fn remove(services: &Services, args: &AlertRemoveArgs) -> Result<()> {
    let id: AlertId = args.id.trim().parse().map_err(|_| DomainError::InvalidAlertId {
        raw: args.id.clone(),
    })?;
    let owner = OwnerId::new(args.owner.trim());

    services.alerts.remove_alert(&owner, &id).await?;
    output::success(&format!("Alert {id} removed"));
    Ok(())
}

async fn check(services: &Services) -> Result<()> {
    let pb = output::spinner("Checking alerts");
    let report = services.scheduler.sweep().await?;
    output::spinner_success(
        &pb,
        &format!(
            "{} checked, {} triggered, {} failed",
            report.checked, report.triggered, report.failed
        ),
    );
    if report.undelivered > 0 {
        output::warning(&format!("{} notifications could not be delivered", report.undelivered));
    }
    Ok(())
}
