// zonewatch-engine/src/runtime.rs

/*!
# Runtime

Entry points shared by every frontend: live monitoring against a real frame
source and analysis service, and deterministic simulation with state-hash
validation. Frontends only decide how to present the operational picture.
*/

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use opentelemetry::KeyValue;
use tracing::{error, info, instrument, warn};
use zonewatch_analyzer::HttpAnalyzer;
use zonewatch_config::ZonewatchConfig;
use zonewatch_core::collaborators::Analyzer;
use zonewatch_core::time::SequentialIds;
use zonewatch_simulator::{
    state_hash, Scenario, ScriptedAnalyzer, SimulatedAnalyzer, SimulatedCamera,
};
use zonewatch_telemetry::{EventLogger, MetricsRecorder};

use crate::engine::{
    BugReport, DiagnosticsCollector, Engine, EngineError, EngineStatus, OperationalPicture,
};

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// Number of cycles to run to an outcome.
    pub cycles: u64,
    /// Overrides the scenario and configured seeds.
    pub seed: Option<u64>,
    pub scenario: Option<PathBuf>,
    /// Expected state hash. Overrides the scenario's `expected_hash`.
    pub validate_hash: Option<String>,
    /// Where bug reports are written on a hash mismatch.
    pub report_dir: PathBuf,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            cycles: 25,
            seed: None,
            scenario: None,
            validate_hash: None,
            report_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug)]
pub struct SimulationReport {
    pub seed: u64,
    pub cycles: u64,
    pub scenario: Option<String>,
    pub picture: OperationalPicture,
    pub state_hash: String,
    pub metrics: Arc<MetricsRecorder>,
}

/// Monitors the configured camera until `shutdown` resolves.
///
/// `on_update` receives a fresh picture after every status change.
#[instrument(level = "info", name = "run_live", skip_all)]
pub async fn run_live<S, F>(
    config: &ZonewatchConfig,
    shutdown: S,
    mut on_update: F,
) -> Result<OperationalPicture, EngineError>
where
    S: Future<Output = ()>,
    F: FnMut(&OperationalPicture),
{
    let frames = zonewatch_capture::from_config(&config.capture)?;
    let analyzer: Arc<dyn Analyzer> = Arc::new(HttpAnalyzer::from_config(&config.analyzer)?);
    info!(
        capture = ?config.capture.mode,
        model = %config.analyzer.model,
        interval_ms = config.sampling.interval_ms,
        "Starting live monitoring"
    );

    let engine = Engine::builder(frames, analyzer).config(config)?.build()?;
    let mut status = engine.subscribe();
    engine.start()?;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                log_status(&current);
                on_update(&engine.picture());
            }
        }
    }

    info!("Shutdown requested");
    engine.stop().await;
    let picture = engine.picture();
    EventLogger::log_event(
        "monitoring_stopped",
        vec![
            KeyValue::new("cycles_completed", picture.status.counters.completed as i64),
            KeyValue::new("cycles_failed", picture.status.counters.failed as i64),
            KeyValue::new("alerts", picture.status.counters.alerts as i64),
        ],
    )
    .await;
    Ok(picture)
}

fn log_status(status: &EngineStatus) {
    let counters = status.counters;
    match &status.last_failure {
        Some(failure) => warn!(
            state = %status.state,
            completed = counters.completed,
            failed = counters.failed,
            skipped = counters.skipped,
            "Degraded: {} ({})",
            failure.kind,
            failure.message
        ),
        None => info!(
            state = %status.state,
            completed = counters.completed,
            failed = counters.failed,
            skipped = counters.skipped,
            alerts = counters.alerts,
            "Status"
        ),
    }
}

/// Runs the engine against simulated collaborators for a fixed number of cycles.
///
/// With a scenario the scripted analyzer replaces the seeded one. When an
/// expected hash is known and differs, a YAML bug report is written and
/// [`EngineError::HashMismatch`] is returned.
#[instrument(level = "info", name = "run_simulation", skip(config))]
pub async fn run_simulation(
    config: &ZonewatchConfig,
    options: SimulationOptions,
) -> Result<SimulationReport, EngineError> {
    let scenario = match &options.scenario {
        Some(path) => {
            info!("Replaying scenario from file: {}", path.display());
            Some(Scenario::load_from_file(path)?)
        }
        None => None,
    };
    let seed = options
        .seed
        .or_else(|| scenario.as_ref().and_then(|s| s.seed))
        .unwrap_or(config.simulator.seed);

    let frames = Arc::new(SimulatedCamera::new(
        seed,
        config.simulator.chaos.capture_failure_probability,
    ));
    let analyzer: Arc<dyn Analyzer> = match &scenario {
        Some(scenario) => Arc::new(ScriptedAnalyzer::new(scenario.clone())?),
        None => Arc::new(SimulatedAnalyzer::from_config(&config.simulator, seed)),
    };

    let engine = Engine::builder(frames, analyzer)
        .config(config)?
        .interval(config.simulator.interval())
        .ids(Arc::new(SequentialIds::new()))
        .cycle_limit(options.cycles)
        .build()?;

    if options.cycles > 0 {
        let mut status = engine.subscribe();
        engine.start()?;
        status
            .wait_for(|status| status.counters.attempted() >= options.cycles)
            .await
            .map(|_| ())
            .map_err(|_| EngineError::StatusClosed)?;
        engine.stop().await;
    }

    let picture = engine.picture();
    let hash = state_hash(&picture.history, &picture.alerts);
    info!("Simulation complete. State hash: {}", hash);

    let expected = options
        .validate_hash
        .clone()
        .or_else(|| scenario.as_ref().and_then(|s| s.expected_hash.clone()));
    if let Some(expected) = expected {
        if expected != hash {
            error!("Hash mismatch! Expected: {}", expected);
            let report = DiagnosticsCollector::new(&options.report_dir).record_bug_report(
                &BugReport {
                    reason: "state hash mismatch".into(),
                    seed,
                    cycles: options.cycles,
                    scenario: scenario.as_ref().map(|s| s.name.clone()),
                    expected_hash: expected.clone(),
                    actual_hash: hash.clone(),
                    counters: picture.status.counters,
                    history: picture
                        .history
                        .iter()
                        .map(|r| format!("{}/{}/{}", r.risk_score(), r.people_count(), r.vehicle_count()))
                        .collect(),
                },
            )?;
            error!("Bug report saved to: {}", report.display());
            return Err(EngineError::HashMismatch {
                expected,
                actual: hash,
                report,
            });
        }
        info!("State hash validated");
    }

    EventLogger::log_event(
        "simulation_complete",
        vec![
            KeyValue::new("cycles", options.cycles as i64),
            KeyValue::new("seed", seed.to_string()),
            KeyValue::new("final_hash", hash.clone()),
        ],
    )
    .await;

    Ok(SimulationReport {
        seed,
        cycles: options.cycles,
        scenario: scenario.map(|s| s.name),
        picture,
        state_hash: hash,
        metrics: engine.metrics(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use zonewatch_config::CaptureMode;

    fn options(cycles: u64, seed: u64) -> SimulationOptions {
        SimulationOptions {
            cycles,
            seed: Some(seed),
            ..SimulationOptions::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulation_is_reproducible() {
        let config = ZonewatchConfig::default();
        let a = run_simulation(&config, options(25, 7)).await.unwrap();
        let b = run_simulation(&config, options(25, 7)).await.unwrap();
        let c = run_simulation(&config, options(25, 8)).await.unwrap();

        assert_eq!(a.state_hash, b.state_hash);
        assert_ne!(a.state_hash, c.state_hash);
        assert_eq!(a.picture.status.counters.attempted(), 25);
        assert_eq!(a.picture.history.len(), 20);
        assert!(a.picture.alerts.len() <= 10);
    }

    #[tokio::test(start_paused = true)]
    async fn chaos_failures_count_towards_cycles() {
        let mut config = ZonewatchConfig::default();
        config.simulator.chaos.capture_failure_probability = 1.0;

        let report = run_simulation(&config, options(5, 1)).await.unwrap();
        assert_eq!(report.picture.status.counters.failed, 5);
        assert!(report.picture.history.is_empty());
        assert!(report.picture.status.last_failure.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn matching_hash_validates() {
        let config = ZonewatchConfig::default();
        let first = run_simulation(&config, options(10, 3)).await.unwrap();

        let validated = run_simulation(
            &config,
            SimulationOptions {
                validate_hash: Some(first.state_hash.clone()),
                ..options(10, 3)
            },
        )
        .await
        .unwrap();
        assert_eq!(validated.state_hash, first.state_hash);
    }

    #[tokio::test(start_paused = true)]
    async fn hash_mismatch_writes_a_bug_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = ZonewatchConfig::default();

        let err = run_simulation(
            &config,
            SimulationOptions {
                validate_hash: Some("deadbeef".into()),
                report_dir: dir.path().to_path_buf(),
                ..options(3, 3)
            },
        )
        .await
        .unwrap_err();

        let EngineError::HashMismatch { report, .. } = err else {
            panic!("expected a hash mismatch, got {err}");
        };
        let text = std::fs::read_to_string(report).unwrap();
        assert!(text.contains("expected_hash: deadbeef"));
        assert!(text.contains("seed: 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_replay_runs_the_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surge.yaml");
        std::fs::write(
            &path,
            r#"
name: surge
seed: 11
steps:
  - report: { peopleCount: 4, vehicleCount: 1, density: Low, flow: Smooth,
              riskScore: 20, summary: "Quiet", prediction: "Stable" }
  - fail: "service unavailable"
  - report: { peopleCount: 15, vehicleCount: 2, density: High, flow: Congested,
              riskScore: 95, summary: "Surge at the gate", prediction: "Worsening" }
"#,
        )
        .unwrap();

        let report = run_simulation(
            &ZonewatchConfig::default(),
            SimulationOptions {
                cycles: 3,
                scenario: Some(path),
                ..SimulationOptions::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(report.seed, 11);
        assert_eq!(report.scenario.as_deref(), Some("surge"));
        assert_eq!(report.picture.history.len(), 2);
        assert_eq!(report.picture.alerts.len(), 1);
        assert_eq!(
            report.picture.alerts[0].message(),
            "Surge at the gate. Prediction: Worsening"
        );
        assert_eq!(report.picture.status.counters.failed, 1);
    }

    #[tokio::test]
    async fn live_mode_requires_a_capture_path() {
        let config = ZonewatchConfig::default();
        let result = run_live(&config, async {}, |_| {}).await;
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[tokio::test]
    async fn live_mode_survives_an_unreachable_analyzer() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.jpg");
        std::fs::write(&frame, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        let mut config = ZonewatchConfig::default();
        config.capture.mode = CaptureMode::Still;
        config.capture.path = Some(frame);
        config.analyzer.base_url = "http://127.0.0.1:9".into();
        config.analyzer.api_key = Some("test".into());
        config.sampling.interval_ms = 20;

        let mut updates = 0;
        let picture = run_live(
            &config,
            tokio::time::sleep(Duration::from_millis(300)),
            |_| updates += 1,
        )
        .await
        .unwrap();

        assert!(updates > 0);
        assert!(picture.status.counters.failed >= 1);
        assert!(picture.history.is_empty());
        assert!(picture.status.last_failure.is_some());
    }
}
