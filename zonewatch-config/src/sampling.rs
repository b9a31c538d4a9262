//! Sampling cadence of the analysis scheduler.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Scheduler timing.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SamplingConfig {
    /// Fixed interval between cycles (milliseconds).
    #[validate(range(min = 10, max = 3_600_000))]
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Upper bound on a single analyzer call (milliseconds).
    #[validate(range(min = 10, max = 600_000))]
    #[serde(default = "default_timeout")]
    pub analysis_timeout_ms: u64,
}

fn default_interval() -> u64 {
    5000
}

fn default_timeout() -> u64 {
    15_000
}

impl SamplingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            analysis_timeout_ms: default_timeout(),
        }
    }
}
