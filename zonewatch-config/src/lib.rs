//! # zonewatch configuration
//!
//! Hierarchical configuration for the sensing loop: sampling cadence, buffer
//! capacities, alert thresholds, zones, and the capture and analysis
//! collaborators.
//!
//! ## Features
//! - **Layered sources**: defaults, YAML files, then `ZONEWATCH_*` environment variables
//! - **Validation**: every section is checked with `validator` before use

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod analyzer;
mod capture;
mod error;
mod rules;
mod sampling;
mod simulator;
mod stores;
mod telemetry;
mod validation;
mod zones;

pub use analyzer::AnalyzerConfig;
pub use capture::{CaptureConfig, CaptureMode};
pub use error::ConfigError;
pub use rules::RuleConfig;
pub use sampling::SamplingConfig;
pub use simulator::{ChaosConfig, LatencyConfig, SimulatorConfig};
pub use stores::StoreConfig;
pub use telemetry::TelemetryConfig;
pub use zones::{ZoneConfig, ZoneEntry};

const BASE_FILE: &str = "config/zonewatch.yaml";
const ENV_PREFIX: &str = "ZONEWATCH_";

/// Top-level configuration container for all zonewatch components.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct ZonewatchConfig {
    /// Scheduler interval and analyzer timeout.
    #[validate(nested)]
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// History and alert buffer capacities.
    #[validate(nested)]
    #[serde(default)]
    pub stores: StoreConfig,

    /// Alert rule thresholds.
    #[validate(nested)]
    #[serde(default)]
    pub rules: RuleConfig,

    /// Monitored zones.
    #[validate(nested)]
    #[serde(default)]
    pub zones: ZoneConfig,

    /// Frame source.
    #[validate(nested)]
    #[serde(default)]
    pub capture: CaptureConfig,

    /// External analysis service.
    #[validate(nested)]
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Simulated collaborators.
    #[validate(nested)]
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Logging.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ZonewatchConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/zonewatch.yaml`, if present
    /// 3. `config/<ZONEWATCH_ENV>.yaml`, if present (`ZONEWATCH_ENV` defaults to `production`)
    /// 4. `ZONEWATCH_*` environment variables, `__` separating sections
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ZonewatchConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("ZONEWATCH_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, still honouring environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment =
            Figment::from(Serialized::defaults(ZonewatchConfig::default())).merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Copy with secrets masked, for printing.
    pub fn redacted(&self) -> Self {
        Self {
            analyzer: self.analyzer.redacted(),
            ..self.clone()
        }
    }
}
