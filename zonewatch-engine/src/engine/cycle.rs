//! One sampling cycle: capture, analyze, validate, store.
//!
//! A cycle either stores exactly one result (plus at most one alert) or
//! stores nothing and reports a failure. Errors never leave this module.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use zonewatch_core::collaborators::{
    Analyzer, FailureReport, FailureSink, FrameSource, Instruction,
};
use zonewatch_core::error::{AnalysisError, CycleError};
use zonewatch_core::monitor::{Ingested, MonitorState};
use zonewatch_core::rules::AlertRules;
use zonewatch_core::time::{Clock, IdSource};
use zonewatch_telemetry::{EventLogger, MetricsRecorder};

use super::scheduler::Ticker;
use super::status::EngineStatus;

/// State shared by the engine handle, the ticker and in-flight cycles.
pub(crate) struct Shared {
    pub(crate) monitor: Mutex<MonitorState>,
    pub(crate) rules: AlertRules,
    pub(crate) frames: Arc<dyn FrameSource>,
    pub(crate) analyzer: Arc<dyn Analyzer>,
    pub(crate) failures: Arc<dyn FailureSink>,
    pub(crate) metrics: Arc<MetricsRecorder>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) ids: Arc<dyn IdSource>,
    pub(crate) analysis_timeout: Duration,
    /// Set while a cycle is in flight. Outlives any single ticker.
    pub(crate) busy: AtomicBool,
    pub(crate) status: watch::Sender<EngineStatus>,
    /// Occupied exactly while the engine is Running.
    pub(crate) ticker: Mutex<Option<Ticker>>,
}

#[instrument(level = "debug", name = "sampling_cycle", skip_all)]
pub(crate) async fn run_cycle(shared: &Shared) {
    match execute(shared).await {
        Ok(ingested) => on_success(shared, ingested).await,
        Err(err) => on_failure(shared, err),
    }
}

async fn execute(shared: &Shared) -> Result<Ingested, CycleError> {
    let frame = shared.frames.capture().await?;
    debug!("Captured {} byte frame", frame.data.len());

    let instruction = Instruction::privacy_directive();
    let started = Instant::now();
    let report = tokio::time::timeout(
        shared.analysis_timeout,
        shared.analyzer.analyze(&frame, &instruction),
    )
    .await
    .map_err(|_| AnalysisError::Timeout(shared.analysis_timeout))??;
    shared
        .metrics
        .analysis_latency
        .observe(started.elapsed().as_secs_f64());

    let ingested = shared.monitor.lock().ingest(
        report,
        &shared.rules,
        shared.ids.as_ref(),
        shared.clock.as_ref(),
    )?;
    Ok(ingested)
}

async fn on_success(shared: &Shared, ingested: Ingested) {
    shared.metrics.cycles_completed.inc();
    debug!(
        risk = ingested.result.risk_score(),
        people = ingested.result.people_count(),
        "Result stored"
    );

    if let Some(alert) = &ingested.alert {
        shared.metrics.inc_alert(alert.severity());
        warn!(
            id = %alert.id(),
            zone = %alert.zone(),
            "{} {} alert: {}",
            alert.severity(),
            alert.kind(),
            alert.message()
        );
        EventLogger::log_event(
            "alert_raised",
            vec![
                KeyValue::new("alert_id", alert.id().to_string()),
                KeyValue::new("type", alert.kind().as_str()),
                KeyValue::new("severity", alert.severity().as_str()),
                KeyValue::new("zone", alert.zone().to_string()),
            ],
        )
        .await;
    }

    let raised = u64::from(ingested.alert.is_some());
    shared.status.send_modify(|status| {
        status.counters.completed += 1;
        status.counters.alerts += raised;
        status.last_failure = None;
    });
}

fn on_failure(shared: &Shared, err: CycleError) {
    let report = FailureReport {
        kind: err.kind(),
        message: err.to_string(),
        timestamp: shared.clock.now(),
    };
    shared.failures.report(&report);
    shared.status.send_modify(|status| {
        status.counters.failed += 1;
        status.last_failure = Some(report);
    });
}
