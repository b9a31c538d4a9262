//! # Latency Models for Simulation
//!
//! Delay applied to simulated analyzer calls.
//!
//! ## Models:
//! - `FixedLatencyModel`: Always adds a fixed delay.
//! - `RandomJitterModel`: Adds a seeded uniform delay from 0 up to a maximum.

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait LatencyModel: Send + Sync {
    fn apply_latency(&self, base: Duration) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedLatencyModel {
    delay: Duration,
}

impl FixedLatencyModel {
    pub fn new(latency_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(latency_ms),
        }
    }
}

impl LatencyModel for FixedLatencyModel {
    #[inline]
    fn apply_latency(&self, base: Duration) -> Duration {
        base + self.delay
    }
}

#[derive(Debug)]
pub struct RandomJitterModel {
    magnitude_ms: u64,
    rng: Mutex<StdRng>,
}

impl RandomJitterModel {
    pub fn new(magnitude_ms: u64, seed: u64) -> Self {
        Self {
            magnitude_ms,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl LatencyModel for RandomJitterModel {
    #[inline]
    fn apply_latency(&self, base: Duration) -> Duration {
        if self.magnitude_ms == 0 {
            return base;
        }
        let added_ms = self.rng.lock().random_range(0..=self.magnitude_ms);
        base + Duration::from_millis(added_ms)
    }
}
