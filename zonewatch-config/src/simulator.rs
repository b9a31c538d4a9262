//! Simulation settings.
//!
//! Used by `zonewatch simulate` in place of a camera and analysis service.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SimulatorConfig {
    /// Seed for deterministic simulation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Sampling interval used while simulating (milliseconds).
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Fault injection.
    #[validate(nested)]
    #[serde(default)]
    pub chaos: ChaosConfig,

    /// Simulated analyzer latency.
    #[validate(nested)]
    #[serde(default)]
    pub latency: LatencyConfig,
}

fn default_seed() -> u64 {
    42
}

fn default_interval() -> u64 {
    20
}

impl SimulatorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            interval_ms: default_interval(),
            chaos: ChaosConfig::default(),
            latency: LatencyConfig::default(),
        }
    }
}

#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ChaosConfig {
    /// Probability that a frame cannot be captured (0.0 to 1.0).
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub capture_failure_probability: f64,

    /// Probability that the analyzer call fails (0.0 to 1.0).
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub fault_probability: f64,

    /// Probability that the analyzer returns out-of-range values (0.0 to 1.0).
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub invalid_probability: f64,
}

#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct LatencyConfig {
    /// Fixed latency in milliseconds.
    #[validate(range(max = 60_000))]
    #[serde(default)]
    pub latency_ms: u64,

    /// Maximum jitter in milliseconds.
    #[validate(range(max = 60_000))]
    #[serde(default)]
    pub jitter_ms: u64,
}
