//! Fixtures for engine tests. Time is paused, so `settle` jumps straight to
//! the next timer deadline.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use zonewatch_core::collaborators::{FailureKind, FailureReport, FailureSink, FrameSource};
use zonewatch_core::model::{AnalysisReport, Density, Flow};
use zonewatch_core::time::{Clock, SequentialIds};
use zonewatch_simulator::{Scenario, ScenarioStep, ScriptedAnalyzer, SimulatedCamera};

use super::lifecycle::Engine;

pub(crate) const PERIOD: Duration = Duration::from_secs(1);

pub(crate) fn report(risk_score: i64, people_count: i64) -> AnalysisReport {
    AnalysisReport {
        people_count,
        vehicle_count: 1,
        density: Density::Medium,
        flow: Flow::Moderate,
        risk_score,
        summary: format!("Risk {risk_score}"),
        prediction: "Steady".into(),
    }
}

pub(crate) fn quiet_report() -> AnalysisReport {
    report(20, 2)
}

pub(crate) fn quiet() -> ScenarioStep {
    ScenarioStep::report(quiet_report())
}

pub(crate) fn scripted(steps: Vec<ScenarioStep>) -> (Arc<dyn FrameSource>, Arc<ScriptedAnalyzer>) {
    let analyzer = ScriptedAnalyzer::new(Scenario::new("test", steps)).unwrap();
    (Arc::new(SimulatedCamera::new(0, 0.0)), Arc::new(analyzer))
}

pub(crate) fn scripted_engine(steps: Vec<ScenarioStep>) -> (Engine, Arc<ScriptedAnalyzer>) {
    let (frames, analyzer) = scripted(steps);
    let engine = Engine::builder(frames, analyzer.clone())
        .interval(PERIOD)
        .ids(Arc::new(SequentialIds::new()))
        .build()
        .unwrap();
    (engine, analyzer)
}

pub(crate) async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[derive(Default)]
pub(crate) struct CollectingSink(Mutex<Vec<FailureReport>>);

impl CollectingSink {
    pub(crate) fn kinds(&self) -> Vec<FailureKind> {
        self.0.lock().iter().map(|failure| failure.kind).collect()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.0.lock().iter().map(|failure| failure.message.clone()).collect()
    }
}

impl FailureSink for CollectingSink {
    fn report(&self, failure: &FailureReport) {
        self.0.lock().push(failure.clone());
    }
}

/// Wall-clock view of Tokio's (paused) clock.
pub(crate) struct TokioClock {
    origin: tokio::time::Instant,
    base: DateTime<Utc>,
}

impl TokioClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            base: Self::base(),
        }
    }

    pub(crate) fn base() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        self.base
            + chrono::Duration::from_std(self.origin.elapsed())
                .unwrap_or_else(|_| chrono::Duration::zero())
    }
}
