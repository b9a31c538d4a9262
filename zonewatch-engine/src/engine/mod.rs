mod cycle;
mod diagnostics;
mod error;
mod lifecycle;
mod scheduler;
mod status;
#[cfg(test)]
pub(crate) mod testing;

pub use self::{
    diagnostics::{BugReport, DiagnosticsCollector},
    error::EngineError,
    lifecycle::{Engine, EngineBuilder},
    status::{CycleCounters, EngineState, EngineStatus, OperationalPicture, Transition},
};

pub mod prelude {
    pub use super::{Engine, EngineError, EngineState, EngineStatus, OperationalPicture, Transition};
}
