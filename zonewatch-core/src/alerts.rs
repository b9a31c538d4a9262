//! Bounded, newest-first alert buffer.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::model::Alert;

/// Default number of alerts kept.
pub const DEFAULT_ALERT_CAPACITY: usize = 10;

/// Newest-first buffer of [`Alert`]s. Records go to the head; the tail is
/// dropped once over capacity. Repeated alerts are kept as-is.
#[derive(Debug, Clone)]
pub struct AlertStore {
    entries: VecDeque<Alert>,
    capacity: usize,
}

impl AlertStore {
    /// # Panics
    /// If `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "alert capacity must be positive");
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn record(&mut self, alert: Alert) {
        self.entries.push_front(alert);
        self.entries.truncate(self.capacity);
    }

    /// Newest-first copy of the buffer.
    pub fn all(&self) -> Arc<[Alert]> {
        self.entries.iter().cloned().collect()
    }

    pub fn newest(&self) -> Option<&Alert> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ALERT_CAPACITY)
    }
}
