//! Monitored zones.
//!
//! A single `main` zone is declared unless the operator lists more.

use serde::{Deserialize, Serialize};
use validator::Validate;
use zonewatch_core::error::ZoneError;
use zonewatch_core::model::ZoneId;
use zonewatch_core::zones::ZoneRegistry;

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validation::validate_zone_set))]
pub struct ZoneConfig {
    /// Zone that results are attributed to at start-up.
    #[validate(custom(function = validation::validate_zone_id))]
    #[serde(default = "default_zone_id")]
    pub default: String,

    /// Every zone the registry knows about.
    #[validate(nested)]
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneEntry>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ZoneEntry {
    #[validate(custom(function = validation::validate_zone_id))]
    pub id: String,

    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

fn default_zone_id() -> String {
    "main".into()
}

fn default_zones() -> Vec<ZoneEntry> {
    vec![ZoneEntry {
        id: default_zone_id(),
        name: "Main area".into(),
    }]
}

impl ZoneConfig {
    /// Builds the registry with the default zone selected.
    pub fn to_registry(&self, history_capacity: usize) -> Result<ZoneRegistry, ZoneError> {
        let default = ZoneId::parse(self.default.as_str())?;
        let name = self
            .zones
            .iter()
            .find(|zone| zone.id == self.default)
            .map(|zone| zone.name.clone())
            .unwrap_or_else(|| self.default.clone());

        let mut registry = ZoneRegistry::new(default, name, history_capacity);
        for zone in self.zones.iter().filter(|zone| zone.id != self.default) {
            registry.register(ZoneId::parse(zone.id.as_str())?, zone.name.clone())?;
        }
        Ok(registry)
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            default: default_zone_id(),
            zones: default_zones(),
        }
    }
}
