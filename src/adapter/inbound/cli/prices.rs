//! Handlers for `prices` and `refresh`.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::PricesArgs;
use crate::adapter::inbound::cli::output;
use crate::application::aggregator::{RefreshReport, SourceOutcome};
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Availability")]
    availability: String,
    #[tabled(rename = "Observed")]
    observed: String,
}

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Listings")]
    listings: String,
    #[tabled(rename = "Upgrades")]
    edges: String,
}

impl From<&SourceOutcome> for SourceRow {
    fn from(outcome: &SourceOutcome) -> Self {
        match outcome {
            SourceOutcome::Fetched {
                source,
                listings,
                edges,
            } => Self {
                source: source.clone(),
                status: "ok".into(),
                listings: listings.to_string(),
                edges: edges.to_string(),
            },
            SourceOutcome::Failed { source, reason } => Self {
                source: source.clone(),
                status: format!("failed: {reason}"),
                listings: "-".into(),
                edges: "-".into(),
            },
        }
    }
}

/// Execute the prices command.
pub async fn execute(services: &Services, args: &PricesArgs) -> Result<()> {
    let ship = services.upgrades.resolve(&args.ship).await?;
    let key = ship.key();
    let index = services.aggregator.index().await?;

    let mut listings: Vec<_> = index.listings_for(&key).cloned().collect();
    listings.sort_by(|a, b| a.price.cmp(&b.price));
    let lowest = services.aggregator.lowest_seen(&key);

    if output::is_json() {
        output::json_output(json!({
            "ship": ship,
            "listings": listings,
            "lowest_seen": lowest,
        }));
        return Ok(());
    }

    output::section(&ship.name);
    if let Some(base) = ship.base_price {
        output::field("Base price", output::money(base));
    }
    if listings.is_empty() {
        output::warning("No current listings for this ship");
    } else {
        let rows: Vec<ListingRow> = listings
            .iter()
            .map(|listing| ListingRow {
                store: listing.store.to_string(),
                price: output::money(listing.price),
                availability: listing.availability.clone(),
                observed: listing.observed_at.format("%Y-%m-%d %H:%M").to_string(),
            })
            .collect();
        output::table(rows);
    }
    if let Some(sample) = lowest {
        output::field(
            "Lowest seen",
            format!(
                "{} at {} ({})",
                output::money(sample.price),
                sample.store,
                sample.observed_at.format("%Y-%m-%d")
            ),
        );
    }
    Ok(())
}

/// Execute the refresh command.
pub async fn refresh(services: &Services) -> Result<()> {
    let pb = output::spinner("Refreshing prices");
    let result = services.aggregator.refresh().await;
    let report = services.aggregator.last_report().unwrap_or_default();

    match result {
        Ok(index) => {
            output::spinner_success(
                &pb,
                &format!(
                    "{} listings and {} upgrades across {} ships",
                    index.listing_count(),
                    index.edge_count(),
                    index.ship_count()
                ),
            );
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            output::spinner_fail(&pb, "No price data available");
            print_report(&report);
            Err(e.into())
        }
    }
}

fn print_report(report: &RefreshReport) {
    if output::is_json() {
        let outcomes: Vec<_> = report
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                SourceOutcome::Fetched {
                    source,
                    listings,
                    edges,
                } => json!({ "source": source, "listings": listings, "edges": edges }),
                SourceOutcome::Failed { source, reason } => {
                    json!({ "source": source, "error": reason })
                }
            })
            .collect();
        output::json_output(json!({ "sources": outcomes }));
        return;
    }
    if report.outcomes.is_empty() {
        return;
    }
    let rows: Vec<SourceRow> = report.outcomes.iter().map(SourceRow::from).collect();
    output::table(rows);
    if report.failed() > 0 {
        output::warning(&format!(
            "{} of {} sources failed",
            report.failed(),
            report.outcomes.len()
        ));
    }
}
