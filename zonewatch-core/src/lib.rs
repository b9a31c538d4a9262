//! # zonewatch-core
//!
//! Foundation layer for the zonewatch sensing loop: the result and alert
//! data model, bounded history and alert buffers, the threshold alert rule
//! and the interfaces to external collaborators.
//!
//! ### Key Submodules:
//! - `model`: validated results, alerts and zone ids
//! - `history` / `alerts`: fixed-capacity buffers with deterministic eviction
//! - `rules`: pure result → alert classification
//! - `monitor`: the single write path into the stores
//! - `time`: injectable clock and alert id sources

pub mod alerts;
pub mod collaborators;
pub mod error;
pub mod history;
pub mod model;
pub mod monitor;
pub mod rules;
pub mod time;
pub mod zones;

pub mod prelude {
    pub use crate::alerts::AlertStore;
    pub use crate::collaborators::*;
    pub use crate::error::*;
    pub use crate::history::HistoryStore;
    pub use crate::model::*;
    pub use crate::monitor::{Ingested, MonitorState};
    pub use crate::rules::{AlertRules, ZoneContext};
    pub use crate::time::*;
    pub use crate::zones::{ZoneData, ZoneRegistry};
}

pub use error::CycleError;
