use std::path::PathBuf;

use thiserror::Error;
use zonewatch_config::ConfigError;
use zonewatch_core::error::ZoneError;
use zonewatch_simulator::ScenarioError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("The engine must be started from within a Tokio runtime")]
    NoRuntime,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Zone error: {0}")]
    Zone(#[from] ZoneError),

    #[error("Invalid capacity: {0} must be at least 1")]
    Capacity(&'static str),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("State hash mismatch: expected {expected}, got {actual} (bug report: {})", report.display())]
    HashMismatch {
        expected: String,
        actual: String,
        report: PathBuf,
    },

    #[error("Status channel closed before the run finished")]
    StatusClosed,

    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
