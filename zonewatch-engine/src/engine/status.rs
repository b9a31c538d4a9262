//! Read-only views published to presentation collaborators.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use zonewatch_core::collaborators::FailureReport;
use zonewatch_core::model::{Alert, AnalysisResult, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum EngineState {
    #[default]
    Idle,
    Running,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => f.write_str("Idle"),
            EngineState::Running => f.write_str("Running"),
        }
    }
}

/// Outcome of a lifecycle call. Repeated calls are no-ops, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    AlreadyRunning,
    Stopped,
    AlreadyIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CycleCounters {
    pub completed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub alerts: u64,
}

impl CycleCounters {
    /// Cycles that ran to an outcome, successful or not.
    pub fn attempted(&self) -> u64 {
        self.completed + self.failed
    }
}

/// Published after every lifecycle change and every cycle outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EngineStatus {
    pub state: EngineState,
    pub counters: CycleCounters,
    /// Most recent failure, cleared by the next successful cycle.
    pub last_failure: Option<FailureReport>,
}

/// Everything a dashboard needs, captured at one instant.
#[derive(Debug, Clone)]
pub struct OperationalPicture {
    pub status: EngineStatus,
    pub zone: ZoneId,
    pub zone_name: String,
    pub latest: Option<AnalysisResult>,
    pub history: Arc<[AnalysisResult]>,
    pub alerts: Arc<[Alert]>,
}
