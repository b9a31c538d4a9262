//! Failure sink that writes abandoned cycles to the log and the metrics registry.

use std::sync::Arc;

use tracing::warn;
use zonewatch_core::collaborators::{FailureReport, FailureSink};

use crate::metrics::MetricsRecorder;

#[derive(Debug, Clone)]
pub struct TracingFailureSink {
    metrics: Arc<MetricsRecorder>,
}

impl TracingFailureSink {
    pub fn new(metrics: Arc<MetricsRecorder>) -> Self {
        Self { metrics }
    }
}

impl FailureSink for TracingFailureSink {
    fn report(&self, failure: &FailureReport) {
        self.metrics.inc_failure(failure.kind);
        warn!(
            kind = %failure.kind,
            at = %failure.timestamp.to_rfc3339(),
            "Cycle abandoned: {}",
            failure.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tracing_test::traced_test;
    use zonewatch_core::collaborators::FailureKind;

    #[traced_test]
    #[test]
    fn failures_are_logged_and_counted() {
        let metrics = Arc::new(MetricsRecorder::new().unwrap());
        let sink = TracingFailureSink::new(metrics.clone());

        sink.report(&FailureReport {
            kind: FailureKind::AnalysisServiceError,
            message: "analysis timed out after 15s".into(),
            timestamp: Utc::now(),
        });

        assert_eq!(metrics.failures(FailureKind::AnalysisServiceError), 1);
        assert!(logs_contain("Cycle abandoned: analysis timed out"));
        assert!(logs_contain("analysis_service_error"));
    }
}
