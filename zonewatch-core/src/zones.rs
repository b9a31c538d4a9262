//! Registry of monitored zones.
//!
//! Only one zone is active at a time. Every accepted result is attributed to
//! the current zone, so each zone's history is a subsequence of the global one.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::ZoneError;
use crate::history::HistoryStore;
use crate::model::{AnalysisResult, ZoneId};
use crate::rules::ZoneContext;

/// A named area and the results attributed to it.
#[derive(Debug, Clone)]
pub struct ZoneData {
    id: ZoneId,
    name: String,
    history: HistoryStore,
}

impl ZoneData {
    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn history(&self) -> Arc<[AnalysisResult]> {
        self.history.snapshot()
    }
}

#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: BTreeMap<ZoneId, ZoneData>,
    current: ZoneId,
    history_capacity: usize,
}

impl ZoneRegistry {
    /// Creates a registry holding only `default`, which becomes current.
    pub fn new(default: ZoneId, name: impl Into<String>, history_capacity: usize) -> Self {
        let mut zones = BTreeMap::new();
        zones.insert(
            default.clone(),
            ZoneData {
                id: default.clone(),
                name: name.into(),
                history: HistoryStore::with_capacity(history_capacity),
            },
        );
        Self {
            zones,
            current: default,
            history_capacity,
        }
    }

    pub fn register(&mut self, id: ZoneId, name: impl Into<String>) -> Result<(), ZoneError> {
        if self.zones.contains_key(&id) {
            return Err(ZoneError::Duplicate(id.to_string()));
        }
        self.zones.insert(
            id.clone(),
            ZoneData {
                id,
                name: name.into(),
                history: HistoryStore::with_capacity(self.history_capacity),
            },
        );
        Ok(())
    }

    pub fn select(&mut self, id: &ZoneId) -> Result<(), ZoneError> {
        if !self.zones.contains_key(id) {
            return Err(ZoneError::UnknownZone(id.to_string()));
        }
        debug!("Current zone: {} -> {}", self.current, id);
        self.current = id.clone();
        Ok(())
    }

    pub fn current(&self) -> &ZoneId {
        &self.current
    }

    pub fn context(&self) -> ZoneContext {
        ZoneContext::new(self.current.clone())
    }

    /// Appends `result` to the current zone's history.
    pub fn record(&mut self, result: AnalysisResult) {
        if let Some(zone) = self.zones.get_mut(&self.current) {
            zone.history.append(result);
        }
    }

    pub fn get(&self, id: &ZoneId) -> Option<&ZoneData> {
        self.zones.get(id)
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneData> {
        self.zones.values()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
