// zonewatch-simulator/src/lib.rs

/*!
# zonewatch Simulator

Deterministic stand-ins for the camera and the vision service, so the
sensing loop can run without hardware or network access and every run with
the same seed stores the same content.

## Key Components:
- **Simulated camera:** synthetic frames with seeded capture failures.
- **Simulated analyzer:** seeded reports with latency, jitter and fault injection.
- **Scenarios:** YAML scripts replayed step by step by the scripted analyzer.
- **State hash:** BLAKE3 digest of stored results and alerts for replay validation.
*/

pub mod analyzer;
pub mod camera;
pub mod chaos;
pub mod hash;
pub mod latency;
pub mod scenario;

pub use analyzer::SimulatedAnalyzer;
pub use camera::SimulatedCamera;
pub use chaos::ChaosInjector;
pub use hash::state_hash;
pub use scenario::{Scenario, ScenarioError, ScenarioStep, ScriptedAnalyzer};
