//! Scripted analyzer runs loaded from YAML.
//!
//! ```yaml
//! name: gate-surge
//! expected_hash: 9f2c...   # optional
//! steps:
//!   - report: { peopleCount: 4, vehicleCount: 1, density: Low, flow: Smooth,
//!               riskScore: 20, summary: "Quiet", prediction: "Stable" }
//!   - fail: "service unavailable"
//!   - invalid: true
//!     delay_ms: 8000
//! ```
//!
//! Each analyzer call consumes one step. Once the script is exhausted the
//! last step repeats.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zonewatch_core::collaborators::{Analyzer, Frame, Instruction};
use zonewatch_core::error::AnalysisError;
use zonewatch_core::model::{AnalysisReport, Density, Flow};

use crate::chaos::inject_fault;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Scenario has no steps")]
    Empty,

    #[error("Scenario step {index}: {reason}")]
    Step { index: usize, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_hash: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

/// One analyzer call. Exactly one of `report`, `fail` or `invalid` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<String>,

    /// Repeat the previous report with an out-of-range risk score.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invalid: bool,

    #[serde(default)]
    pub delay_ms: u64,
}

impl ScenarioStep {
    pub fn report(report: AnalysisReport) -> Self {
        Self {
            report: Some(report),
            ..Self::default()
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            fail: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn invalid() -> Self {
        Self {
            invalid: true,
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    fn outcomes(&self) -> usize {
        usize::from(self.report.is_some()) + usize::from(self.fail.is_some()) + usize::from(self.invalid)
    }
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<ScenarioStep>) -> Self {
        Self {
            name: name.into(),
            seed: None,
            expected_hash: None,
            steps,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::Empty);
        }
        for (index, step) in self.steps.iter().enumerate() {
            match step.outcomes() {
                1 => {}
                0 => {
                    return Err(ScenarioError::Step {
                        index,
                        reason: "needs one of report, fail or invalid",
                    })
                }
                _ => {
                    return Err(ScenarioError::Step {
                        index,
                        reason: "report, fail and invalid are mutually exclusive",
                    })
                }
            }
        }
        Ok(())
    }
}

/// Replays a [`Scenario`] one step per call.
#[derive(Debug)]
pub struct ScriptedAnalyzer {
    steps: Vec<ScenarioStep>,
    cursor: Mutex<Cursor>,
}

#[derive(Debug, Default)]
struct Cursor {
    next: usize,
    last_report: Option<AnalysisReport>,
}

impl ScriptedAnalyzer {
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        Ok(Self {
            steps: scenario.steps,
            cursor: Mutex::new(Cursor::default()),
        })
    }

    pub fn calls(&self) -> usize {
        self.cursor.lock().next
    }
}

fn placeholder_report() -> AnalysisReport {
    AnalysisReport {
        people_count: 0,
        vehicle_count: 0,
        density: Density::Low,
        flow: Flow::Smooth,
        risk_score: 0,
        summary: "No activity".into(),
        prediction: "No change expected".into(),
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(
        &self,
        _frame: &Frame,
        _instruction: &Instruction,
    ) -> Result<AnalysisReport, AnalysisError> {
        let (step, index) = {
            let mut cursor = self.cursor.lock();
            let index = cursor.next.min(self.steps.len() - 1);
            cursor.next += 1;
            (self.steps[index].clone(), index)
        };
        debug!("Scripted step {}", index);

        if step.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
        }

        if let Some(message) = step.fail {
            return Err(AnalysisError::Unreachable(message));
        }

        let mut cursor = self.cursor.lock();
        if let Some(report) = step.report {
            cursor.last_report = Some(report.clone());
            return Ok(report);
        }

        let mut report = cursor.last_report.clone().unwrap_or_else(placeholder_report);
        inject_fault(&mut report);
        Ok(report)
    }
}
