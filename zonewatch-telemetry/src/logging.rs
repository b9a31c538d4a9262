//! ## zonewatch-telemetry::logging
//! **Structured logging with tracing and OpenTelemetry attributes**

use opentelemetry::KeyValue;
use tracing::{info, info_span};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};
use zonewatch_config::TelemetryConfig;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` wins over the configured level.
    /// Calling it twice is harmless; the second call is ignored.
    pub fn init(config: &TelemetryConfig) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

        let builder = fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE);

        let _ = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    }

    /// Emits one structured record for `event_type`. Attributes are flattened
    /// to `key=value` pairs so both formatters print them on the same line.
    pub async fn log_event(event_type: &str, attributes: Vec<KeyValue>) {
        let fields = attributes
            .iter()
            .map(|attribute| format!("{}={}", attribute.key, attribute.value))
            .collect::<Vec<_>>()
            .join(" ");

        info_span!("zonewatch_event", kind = event_type, otel.kind = "INTERNAL")
            .in_scope(|| info!(attributes = %fields, "{} recorded", event_type));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(EventLogger::log_event(
                "simulation_complete",
                vec![KeyValue::new("cycles", "25")],
            ));
        assert!(logs_contain("simulation_complete recorded"));
        assert!(logs_contain("cycles=25"));
    }
}
