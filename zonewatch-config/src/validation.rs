//! Custom validation functions for configuration.
//!
//! Provides shared validation logic used across multiple configuration modules.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;
use zonewatch_core::model::ZoneId;

use crate::rules::RuleConfig;
use crate::zones::ZoneConfig;

lazy_static! {
    static ref MIME_TYPE: Regex =
        Regex::new("^image/(jpeg|png|webp)$").expect("mime type pattern");
}

/// Validate that a zone id is usable as a [`ZoneId`].
pub fn validate_zone_id(id: &str) -> Result<(), ValidationError> {
    ZoneId::parse(id)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_zone_id"))
}

/// Validate that the critical threshold does not sit below the alert threshold.
pub fn validate_threshold_order(rules: &RuleConfig) -> Result<(), ValidationError> {
    if rules.critical_above >= rules.alert_above {
        Ok(())
    } else {
        Err(ValidationError::new("critical_below_alert_threshold"))
    }
}

/// Validate that the default zone is declared and no id repeats.
pub fn validate_zone_set(zones: &ZoneConfig) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for zone in &zones.zones {
        if !seen.insert(zone.id.as_str()) {
            return Err(ValidationError::new("duplicate_zone"));
        }
    }
    if seen.contains(zones.default.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("default_zone_not_declared"))
    }
}

/// Validate an image mime type for captured frames.
pub fn validate_mime_type(mime: &str) -> Result<(), ValidationError> {
    if MIME_TYPE.is_match(mime) {
        Ok(())
    } else {
        Err(ValidationError::new("unsupported_mime_type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_ids() {
        assert!(validate_zone_id("main").is_ok());
        assert!(validate_zone_id("North Gate").is_err());
    }

    #[test]
    fn mime_types() {
        assert!(validate_mime_type("image/jpeg").is_ok());
        assert!(validate_mime_type("image/gif").is_err());
    }

    #[test]
    fn threshold_order() {
        let mut rules = RuleConfig::default();
        assert!(validate_threshold_order(&rules).is_ok());
        rules.critical_above = 60;
        assert!(validate_threshold_order(&rules).is_err());
    }
}
