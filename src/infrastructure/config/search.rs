//! Upgrade search configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::upgrade::engine::DEFAULT_MAX_STEPS;
use crate::application::upgrade::score::ScoringConfig;

/// `[search]` section: step limit and ranking weights.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_minutes_per_step")]
    pub minutes_per_step: u64,
    #[serde(default = "default_cost_weight")]
    pub cost_weight: Decimal,
    #[serde(default = "default_step_weight")]
    pub step_weight: Decimal,
    #[serde(default = "default_risk_weight")]
    pub risk_weight: Decimal,
    #[serde(default = "default_step_penalty")]
    pub step_penalty: Decimal,
    #[serde(default = "default_risk_scale")]
    pub risk_scale: Decimal,
    #[serde(default = "default_unofficial_store_risk")]
    pub unofficial_store_risk: Decimal,
    #[serde(default = "default_limited_risk")]
    pub limited_risk: Decimal,
    #[serde(default = "default_out_of_stock_risk")]
    pub out_of_stock_risk: Decimal,
}

const fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

const fn default_max_results() -> usize {
    10
}

const fn default_minutes_per_step() -> u64 {
    10
}

fn default_cost_weight() -> Decimal {
    Decimal::ONE
}

fn default_step_weight() -> Decimal {
    Decimal::new(2, 1) // 0.2
}

fn default_risk_weight() -> Decimal {
    Decimal::new(3, 1) // 0.3
}

fn default_step_penalty() -> Decimal {
    Decimal::from(50)
}

fn default_risk_scale() -> Decimal {
    Decimal::from(100)
}

fn default_unofficial_store_risk() -> Decimal {
    Decimal::new(1, 1)
}

fn default_limited_risk() -> Decimal {
    Decimal::new(3, 1)
}

fn default_out_of_stock_risk() -> Decimal {
    Decimal::new(5, 1)
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_results: default_max_results(),
            minutes_per_step: default_minutes_per_step(),
            cost_weight: default_cost_weight(),
            step_weight: default_step_weight(),
            risk_weight: default_risk_weight(),
            step_penalty: default_step_penalty(),
            risk_scale: default_risk_scale(),
            unofficial_store_risk: default_unofficial_store_risk(),
            limited_risk: default_limited_risk(),
            out_of_stock_risk: default_out_of_stock_risk(),
        }
    }
}

impl From<&SearchSettings> for ScoringConfig {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            cost_weight: settings.cost_weight,
            step_weight: settings.step_weight,
            risk_weight: settings.risk_weight,
            step_penalty: settings.step_penalty,
            risk_scale: settings.risk_scale,
            unofficial_store_risk: settings.unofficial_store_risk,
            limited_risk: settings.limited_risk,
            out_of_stock_risk: settings.out_of_stock_risk,
            minutes_per_step: settings.minutes_per_step,
            max_results: settings.max_results,
        }
    }
}
