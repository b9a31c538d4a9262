//! Chaos module.
//!
//! Fault injection for simulation: dropped frames, failed analyzer calls and
//! reports that violate the value invariants.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zonewatch_config::ChaosConfig;
use zonewatch_core::model::{AnalysisReport, MAX_RISK_SCORE};

/// Pushes the risk score out of range so the report is rejected on acceptance.
pub fn inject_fault(report: &mut AnalysisReport) {
    report.risk_score += i64::from(MAX_RISK_SCORE) + 1;
}

/// Seeded coin flips for each kind of injected failure.
#[derive(Debug)]
pub struct ChaosInjector {
    fault_probability: f64,
    invalid_probability: f64,
    rng: Mutex<StdRng>,
}

impl ChaosInjector {
    pub fn new(fault_probability: f64, invalid_probability: f64, seed: u64) -> Self {
        Self {
            fault_probability: fault_probability.clamp(0.0, 1.0),
            invalid_probability: invalid_probability.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_config(config: &ChaosConfig, seed: u64) -> Self {
        Self::new(config.fault_probability, config.invalid_probability, seed)
    }

    /// No faults at all.
    pub fn disabled() -> Self {
        Self::new(0.0, 0.0, 0)
    }

    pub fn should_fault(&self) -> bool {
        self.fault_probability > 0.0 && self.rng.lock().random_bool(self.fault_probability)
    }

    pub fn should_corrupt(&self) -> bool {
        self.invalid_probability > 0.0 && self.rng.lock().random_bool(self.invalid_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewatch_core::model::{Density, Flow};

    fn quiet() -> AnalysisReport {
        AnalysisReport {
            people_count: 1,
            vehicle_count: 0,
            density: Density::Low,
            flow: Flow::Smooth,
            risk_score: 0,
            summary: "Empty square".into(),
            prediction: "No change".into(),
        }
    }

    #[test]
    fn injected_fault_is_out_of_range() {
        for score in [0, 50, 100] {
            let mut report = AnalysisReport {
                risk_score: score,
                ..quiet()
            };
            inject_fault(&mut report);
            assert!(report.risk_score > i64::from(MAX_RISK_SCORE));
        }
    }

    #[test]
    fn disabled_injector_never_fires() {
        let chaos = ChaosInjector::disabled();
        assert!((0..1000).all(|_| !chaos.should_fault() && !chaos.should_corrupt()));
    }

    #[test]
    fn certain_faults_always_fire() {
        let chaos = ChaosInjector::new(1.0, 1.0, 9);
        assert!((0..100).all(|_| chaos.should_fault() && chaos.should_corrupt()));
    }
}
