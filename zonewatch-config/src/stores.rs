//! Capacities of the in-memory history and alert buffers.

use serde::{Deserialize, Serialize};
use validator::Validate;
use zonewatch_core::alerts::DEFAULT_ALERT_CAPACITY;
use zonewatch_core::history::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct StoreConfig {
    /// Results kept in the rolling history.
    #[validate(range(min = 1, max = 10_000))]
    #[serde(default = "default_history")]
    pub history_capacity: usize,

    /// Alerts kept, newest first.
    #[validate(range(min = 1, max = 10_000))]
    #[serde(default = "default_alerts")]
    pub alert_capacity: usize,
}

fn default_history() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_alerts() -> usize {
    DEFAULT_ALERT_CAPACITY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history(),
            alert_capacity: default_alerts(),
        }
    }
}
