//! ## zonewatch-core::time
//! **Injectable clocks and alert id sources**
//!
//! Production code reads wall-clock time through [`SystemClock`] and mints
//! UUID alert ids through [`RandomIds`]. Tests and the simulator swap in
//! [`ManualClock`] and [`SequentialIds`] so that runs are reproducible.

mod ids;

pub use ids::{IdSource, RandomIds, SequentialIds};

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// Source of "now" for acceptance and alert timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock with nanosecond resolution.
#[derive(Debug, Clone)]
pub struct ManualClock {
    // Nanoseconds since the Unix epoch.
    offset: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            offset: Arc::new(AtomicI64::new(to_nanos(start))),
        }
    }

    #[inline]
    pub fn now_ns(&self) -> i64 {
        self.offset.load(Ordering::Acquire)
    }

    #[inline]
    pub fn advance(&self, by: Duration) {
        let ns = i64::try_from(by.as_nanos()).unwrap_or(i64::MAX);
        self.offset.fetch_add(ns, Ordering::AcqRel);
    }

    /// Moves the clock to an arbitrary instant, including backwards.
    pub fn set(&self, at: DateTime<Utc>) {
        self.offset.store(to_nanos(at), Ordering::Release);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc.timestamp_nanos(0))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.now_ns())
    }
}

fn to_nanos(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(i64::MAX)
}
