//! # zonewatch telemetry
//!
//! Crate for logging, metrics and failure reporting.

pub mod logging;
pub mod metrics;
pub mod reporter;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
pub use reporter::TracingFailureSink;
