//! ## zonewatch-telemetry::metrics
//! **Prometheus counters and histograms for the sensing loop**

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use zonewatch_core::collaborators::FailureKind;
use zonewatch_core::model::Severity;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub cycles_completed: IntCounter,
    pub cycles_failed: IntCounterVec,
    pub ticks_skipped: IntCounter,
    pub alerts_raised: IntCounterVec,
    pub analysis_latency: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_completed = IntCounter::new(
            "zonewatch_cycles_completed_total",
            "Sampling cycles whose result was stored",
        )?;
        let cycles_failed = IntCounterVec::new(
            Opts::new(
                "zonewatch_cycles_failed_total",
                "Sampling cycles abandoned, by failure kind",
            ),
            &["kind"],
        )?;
        let ticks_skipped = IntCounter::new(
            "zonewatch_ticks_skipped_total",
            "Ticks skipped because a cycle was still in flight",
        )?;
        let alerts_raised = IntCounterVec::new(
            Opts::new("zonewatch_alerts_total", "Alerts raised, by severity"),
            &["severity"],
        )?;
        let analysis_latency = Histogram::with_opts(
            HistogramOpts::new(
                "zonewatch_analysis_latency_seconds",
                "Time spent waiting for the analysis service",
            )
            .buckets(vec![0.05, 0.25, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;

        registry.register(Box::new(cycles_completed.clone()))?;
        registry.register(Box::new(cycles_failed.clone()))?;
        registry.register(Box::new(ticks_skipped.clone()))?;
        registry.register(Box::new(alerts_raised.clone()))?;
        registry.register(Box::new(analysis_latency.clone()))?;

        Ok(Self {
            registry,
            cycles_completed,
            cycles_failed,
            ticks_skipped,
            alerts_raised,
            analysis_latency,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn inc_failure(&self, kind: FailureKind) {
        self.cycles_failed.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn inc_alert(&self, severity: Severity) {
        self.alerts_raised
            .with_label_values(&[severity.as_str()])
            .inc();
    }

    pub fn failures(&self, kind: FailureKind) -> u64 {
        self.cycles_failed.with_label_values(&[kind.as_str()]).get()
    }
}
