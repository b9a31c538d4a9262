//! Observability configuration.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Logging parameters. `RUST_LOG`, when set, overrides `level`.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// Default log level (trace, debug, info, warn, error).
    #[validate(custom(function = validate_level))]
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable logs.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".into()
}

fn validate_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"].contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}
