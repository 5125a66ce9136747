//! Handlers for `search` and `ships`.

use std::collections::BTreeSet;

use tabled::Tabled;

use crate::adapter::inbound::cli::command::{SearchArgs, ShipsArgs};
use crate::adapter::inbound::cli::output;
use crate::domain::{SearchOutcome, Store, UpgradePath};
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;
use crate::infrastructure::config::settings::MAX_SEARCH_STEPS;

#[derive(Tabled)]
struct PathRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Stores")]
    stores: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Steps")]
    steps: usize,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Savings")]
    savings: String,
}

impl PathRow {
    fn new(rank: usize, path: &UpgradePath) -> Self {
        Self {
            rank,
            route: path.route(),
            stores: path.store_path(),
            cost: output::money(path.total_cost),
            steps: path.step_count(),
            risk: format!("{:.2}", path.risk_level),
            score: format!("{:.1}", path.efficiency_score),
            savings: output::money(path.savings),
        }
    }
}

#[derive(Tabled)]
struct ShipRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Manufacturer")]
    manufacturer: String,
    #[tabled(rename = "Base Price")]
    base_price: String,
}

/// Parse repeated `--store` values. Empty input means every store.
pub(crate) fn parse_stores(raw: &[String]) -> BTreeSet<Store> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(Store::parse)
        .collect()
}

/// Execute the search command.
pub async fn execute(
    services: &Services,
    args: &SearchArgs,
    default_max_steps: usize,
) -> Result<()> {
    let max_steps = args.max_steps.unwrap_or(default_max_steps).min(MAX_SEARCH_STEPS);
    let stores = parse_stores(&args.stores);
    let stores = (!stores.is_empty()).then_some(stores);

    let pb = output::spinner("Searching upgrade paths");
    let outcome = match services
        .upgrades
        .search(&args.from, &args.to, stores, max_steps)
        .await
    {
        Ok(outcome) => {
            output::spinner_success(&pb, "Search complete");
            outcome
        }
        Err(e) => {
            output::spinner_fail(&pb, "Search failed");
            return Err(e);
        }
    };

    if output::is_json() {
        output::json_output(serde_json::to_value(&outcome)?);
        return Ok(());
    }
    print_outcome(&outcome, args.limit);
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome, limit: usize) {
    output::section(&format!("{} → {}", outcome.from, outcome.to));

    if outcome.is_empty() {
        let reason = outcome.no_path_reason.as_deref().unwrap_or("no upgrade path found");
        output::warning(reason);
        output::hint("try a larger --max-steps or drop --store filters");
        return;
    }

    let rows: Vec<PathRow> = outcome
        .paths
        .iter()
        .take(limit.max(1))
        .enumerate()
        .map(|(i, path)| PathRow::new(i + 1, path))
        .collect();
    output::table(rows);

    if let Some(cheapest) = outcome.cheapest() {
        output::field("Cheapest", output::positive(output::money(cheapest.total_cost)));
        output::field("Est. time", format!("{} min", cheapest.time_estimate.as_secs() / 60));
    }

    if !outcome.direct.is_empty() {
        output::section("Direct upgrades");
        let rows: Vec<PathRow> = outcome
            .direct
            .iter()
            .enumerate()
            .map(|(i, path)| PathRow::new(i + 1, path))
            .collect();
        output::table(rows);
    }
}

/// Execute the ships command.
pub async fn ships(services: &Services, args: &ShipsArgs) -> Result<()> {
    let ships = services.upgrades.suggest(&args.query, args.limit).await;

    if output::is_json() {
        output::json_output(serde_json::to_value(&ships)?);
        return Ok(());
    }

    if ships.is_empty() {
        output::warning(&format!("No ships match '{}'", args.query));
        return Ok(());
    }

    let rows: Vec<ShipRow> = ships
        .into_iter()
        .map(|ship| ShipRow {
            name: ship.name,
            manufacturer: ship.manufacturer.unwrap_or_default(),
            base_price: ship
                .base_price
                .map(output::money)
                .unwrap_or_else(|| "-".into()),
        })
        .collect();
    output::table(rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_flags_are_normalized() {
        let stores = parse_stores(&["RSI".into(), "star-hangar".into(), " ".into()]);
        assert_eq!(stores.len(), 2);
        assert!(stores.contains(&Store::Rsi));
        assert!(stores.contains(&Store::StarHangar));
    }

    #[test]
    fn no_store_flags_means_empty_set() {
        assert!(parse_stores(&[]).is_empty());
    }
}
