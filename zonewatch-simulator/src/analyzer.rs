use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;
use zonewatch_config::SimulatorConfig;
use zonewatch_core::collaborators::{Analyzer, Frame, Instruction};
use zonewatch_core::error::AnalysisError;
use zonewatch_core::model::{AnalysisReport, Density, Flow};

use crate::chaos::{inject_fault, ChaosInjector};
use crate::latency::{FixedLatencyModel, LatencyModel, RandomJitterModel};

/// Seeded stand-in for the vision service. The same seed yields the same
/// sequence of reports, faults and delays.
#[derive(Debug)]
pub struct SimulatedAnalyzer {
    rng: Mutex<StdRng>,
    chaos: ChaosInjector,
    latency: FixedLatencyModel,
    jitter: RandomJitterModel,
}

impl SimulatedAnalyzer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            chaos: ChaosInjector::disabled(),
            latency: FixedLatencyModel::new(0),
            jitter: RandomJitterModel::new(0, seed),
        }
    }

    pub fn from_config(config: &SimulatorConfig, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            chaos: ChaosInjector::from_config(&config.chaos, seed.wrapping_add(1)),
            latency: FixedLatencyModel::new(config.latency.latency_ms),
            jitter: RandomJitterModel::new(config.latency.jitter_ms, seed.wrapping_add(2)),
        }
    }

    pub fn with_chaos(mut self, chaos: ChaosInjector) -> Self {
        self.chaos = chaos;
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency = FixedLatencyModel::new(latency_ms);
        self
    }

    fn next_report(&self) -> AnalysisReport {
        let mut rng = self.rng.lock();
        let people: i64 = rng.random_range(0..=30);
        let vehicles: i64 = rng.random_range(0..=20);
        let risk_score: i64 = rng.random_range(0..=100);

        let density = match people {
            0..=4 => Density::Low,
            5..=11 => Density::Medium,
            12..=19 => Density::High,
            _ => Density::Critical,
        };
        let flow = match vehicles {
            0..=4 => Flow::Smooth,
            5..=9 => Flow::Moderate,
            10..=14 => Flow::Congested,
            _ => Flow::Stalled,
        };
        let prediction = if risk_score > 75 {
            "Conditions likely to worsen"
        } else {
            "Conditions expected to remain stable"
        };

        AnalysisReport {
            people_count: people,
            vehicle_count: vehicles,
            density,
            flow,
            risk_score,
            summary: format!("{people} people and {vehicles} vehicles in view"),
            prediction: prediction.into(),
        }
    }
}

#[async_trait]
impl Analyzer for SimulatedAnalyzer {
    async fn analyze(
        &self,
        _frame: &Frame,
        _instruction: &Instruction,
    ) -> Result<AnalysisReport, AnalysisError> {
        let delay = self
            .jitter
            .apply_latency(self.latency.apply_latency(Duration::ZERO));
        if !delay.is_zero() {
            trace!("Simulated analysis latency {:?}", delay);
            tokio::time::sleep(delay).await;
        }

        if self.chaos.should_fault() {
            return Err(AnalysisError::Unreachable("injected fault".into()));
        }

        let mut report = self.next_report();
        if self.chaos.should_corrupt() {
            inject_fault(&mut report);
        }
        Ok(report)
    }
}
