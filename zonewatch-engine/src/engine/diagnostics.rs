use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use super::error::EngineError;
use super::status::CycleCounters;

/// Everything needed to reproduce a simulation whose state hash diverged.
#[derive(Debug, Clone, Serialize)]
pub struct BugReport {
    pub reason: String,
    pub seed: u64,
    pub cycles: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    pub expected_hash: String,
    pub actual_hash: String,
    pub counters: CycleCounters,
    /// `risk/people/vehicles` per stored result, oldest first.
    pub history: Vec<String>,
}

#[derive(Debug)]
pub struct DiagnosticsCollector {
    dir: PathBuf,
    bug_reports: Vec<PathBuf>,
}

impl DiagnosticsCollector {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            bug_reports: Vec::new(),
        }
    }

    /// Writes `report` as YAML and returns the file path.
    pub fn record_bug_report(&mut self, report: &BugReport) -> Result<PathBuf, EngineError> {
        let yaml = serde_yaml::to_string(report)?;
        fs::create_dir_all(&self.dir)?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let path = self.dir.join(format!("bug_report_{stamp}.yaml"));
        fs::write(&path, yaml)?;

        self.bug_reports.push(path.clone());
        Ok(path)
    }

    pub fn bug_reports(&self) -> &[PathBuf] {
        &self.bug_reports
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
