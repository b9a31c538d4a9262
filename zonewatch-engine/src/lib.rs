//! # zonewatch engine
//!
//! The Idle/Running engine that owns the analysis scheduler and the
//! operational picture, plus the runtime entry points that wire it to live
//! or simulated collaborators.

pub mod engine;
pub mod runtime;

// Re-export the runtime functions so frontends can simply do:
pub use engine::{Engine, EngineError, EngineState, EngineStatus, OperationalPicture, Transition};
pub use runtime::{run_live, run_simulation, SimulationOptions, SimulationReport};
