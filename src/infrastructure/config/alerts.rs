//! Alert store and scheduler configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use serde::Deserialize;

use crate::application::alert::scheduler::SchedulerConfig;
use crate::application::alert::service::AlertPolicy;

/// `[alerts]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertSettings {
    /// Keep alerts in a JSON file; `false` keeps them in memory only.
    #[serde(default = "default_persist")]
    pub persist: bool,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default = "default_max_active_per_owner")]
    pub max_active_per_owner: usize,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Pause between consecutive alert checks.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Days a triggered or removed alert is kept before pruning.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

const fn default_persist() -> bool {
    true
}

fn default_store_path() -> PathBuf {
    PathBuf::from("alerts.json")
}

const fn default_max_active_per_owner() -> usize {
    10
}

const fn default_check_interval_secs() -> u64 {
    30 * 60
}

const fn default_sweep_interval_secs() -> u64 {
    60 * 60
}

const fn default_throttle_ms() -> u64 {
    2000
}

const fn default_retention_days() -> u32 {
    30
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            store_path: default_store_path(),
            max_active_per_owner: default_max_active_per_owner(),
            check_interval_secs: default_check_interval_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            throttle_ms: default_throttle_ms(),
            retention_days: default_retention_days(),
        }
    }
}

impl AlertSettings {
    #[must_use]
    pub fn retention(&self) -> ChronoDuration {
        ChronoDuration::days(i64::from(self.retention_days))
    }

    #[must_use]
    pub fn policy(&self) -> AlertPolicy {
        AlertPolicy {
            max_active_per_owner: self.max_active_per_owner,
            retention: self.retention(),
        }
    }

    #[must_use]
    pub fn scheduler(&self, max_steps: usize) -> SchedulerConfig {
        SchedulerConfig {
            check_interval: Duration::from_secs(self.check_interval_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            throttle: Duration::from_millis(self.throttle_ms),
            max_steps,
            retention: self.retention(),
        }
    }
}
