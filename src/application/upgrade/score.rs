//! Path scoring.
//!
//! Lower scores rank first. The score blends cost, step count and
//! purchase risk; every weight is configurable so product can tune the
//! ranking without touching the search.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{Price, UpgradeStep};

/// Ranking weights and penalties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub cost_weight: Decimal,
    pub step_weight: Decimal,
    pub risk_weight: Decimal,
    /// Price-equivalent penalty per step before weighting.
    pub step_penalty: Decimal,
    /// Multiplier from `[0, 1]` risk to price-equivalent units.
    pub risk_scale: Decimal,
    /// Risk added for buying outside the official store.
    pub unofficial_store_risk: Decimal,
    /// Risk added when availability mentions "limited".
    pub limited_risk: Decimal,
    /// Risk added when availability mentions "out".
    pub out_of_stock_risk: Decimal,
    /// Purchase cycle time per step.
    pub minutes_per_step: u64,
    /// Maximum ranked paths returned.
    pub max_results: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cost_weight: dec!(1.0),
            step_weight: dec!(0.2),
            risk_weight: dec!(0.3),
            step_penalty: dec!(50),
            risk_scale: dec!(100),
            unofficial_store_risk: dec!(0.1),
            limited_risk: dec!(0.3),
            out_of_stock_risk: dec!(0.5),
            minutes_per_step: 10,
            max_results: 10,
        }
    }
}

impl ScoringConfig {
    /// Risk of a single purchase.
    #[must_use]
    pub fn step_risk(&self, step: &UpgradeStep) -> Decimal {
        let mut risk = Decimal::ZERO;
        if !step.store.is_official() {
            risk += self.unofficial_store_risk;
        }
        let availability = step.availability.to_lowercase();
        if availability.contains("limited") {
            risk += self.limited_risk;
        }
        if availability.contains("out") {
            risk += self.out_of_stock_risk;
        }
        risk
    }

    /// Mean step risk, clamped into `[0, 1]`.
    #[must_use]
    pub fn path_risk(&self, steps: &[UpgradeStep]) -> Decimal {
        if steps.is_empty() {
            return Decimal::ZERO;
        }
        let total: Decimal = steps.iter().map(|step| self.step_risk(step)).sum();
        let mean = total / Decimal::from(steps.len());
        mean.clamp(Decimal::ZERO, Decimal::ONE)
    }

    #[must_use]
    pub fn efficiency_score(&self, total_cost: Price, steps: usize, risk: Decimal) -> Decimal {
        let step_term = Decimal::from(steps) * self.step_penalty * self.step_weight;
        let risk_term = risk * self.risk_scale * self.risk_weight;
        total_cost * self.cost_weight + step_term + risk_term
    }

    #[must_use]
    pub fn time_estimate(&self, steps: usize) -> Duration {
        Duration::from_secs(self.minutes_per_step * 60 * steps as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ShipKey, Store};

    fn step(store: Store, availability: &str) -> UpgradeStep {
        UpgradeStep {
            from: ShipKey::new("a"),
            to: ShipKey::new("b"),
            store,
            price: dec!(10),
            url: None,
            availability: availability.into(),
        }
    }

    #[test]
    fn official_in_stock_step_has_no_risk() {
        let config = ScoringConfig::default();
        assert_eq!(config.step_risk(&step(Store::Rsi, "In stock")), Decimal::ZERO);
    }

    #[test]
    fn risk_factors_accumulate_case_insensitively() {
        let config = ScoringConfig::default();
        assert_eq!(config.step_risk(&step(Store::Grey, "LIMITED")), dec!(0.4));
        assert_eq!(config.step_risk(&step(Store::Grey, "Out of stock")), dec!(0.6));
    }

    #[test]
    fn path_risk_is_mean_clamped() {
        let config = ScoringConfig {
            out_of_stock_risk: dec!(2),
            ..ScoringConfig::default()
        };
        let steps = [step(Store::Rsi, "out"), step(Store::Rsi, "out")];
        assert_eq!(config.path_risk(&steps), Decimal::ONE);

        let steps = [step(Store::Rsi, ""), step(Store::Grey, "")];
        assert_eq!(ScoringConfig::default().path_risk(&steps), dec!(0.05));
    }

    #[test]
    fn score_combines_weighted_terms() {
        let config = ScoringConfig::default();
        // 80 + 2*50*0.2 + 0.1*100*0.3
        assert_eq!(config.efficiency_score(dec!(80), 2, dec!(0.1)), dec!(103));
    }

    #[test]
    fn time_estimate_scales_with_steps() {
        let config = ScoringConfig::default();
        assert_eq!(config.time_estimate(3), Duration::from_secs(1800));
    }
}
