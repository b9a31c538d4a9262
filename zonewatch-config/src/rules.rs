//! Alerting thresholds.

use serde::{Deserialize, Serialize};
use validator::Validate;
use zonewatch_core::rules::AlertRules;

use crate::validation;

/// Thresholds for the alert rule. Every comparison is strictly greater-than.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validation::validate_threshold_order))]
pub struct RuleConfig {
    /// Risk scores above this raise an alert.
    #[validate(range(max = 100))]
    #[serde(default = "default_alert_above")]
    pub alert_above: u8,

    /// Risk scores above this raise a critical alert.
    #[validate(range(max = 100))]
    #[serde(default = "default_critical_above")]
    pub critical_above: u8,

    /// People counts above this classify the alert as overcrowding.
    #[serde(default = "default_overcrowding_above")]
    pub overcrowding_above: u32,
}

fn default_alert_above() -> u8 {
    AlertRules::default().alert_above
}

fn default_critical_above() -> u8 {
    AlertRules::default().critical_above
}

fn default_overcrowding_above() -> u32 {
    AlertRules::default().overcrowding_above
}

impl RuleConfig {
    pub fn to_rules(&self) -> AlertRules {
        AlertRules {
            alert_above: self.alert_above,
            critical_above: self.critical_above,
            overcrowding_above: self.overcrowding_above,
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            alert_above: default_alert_above(),
            critical_above: default_critical_above(),
            overcrowding_above: default_overcrowding_above(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_rule_engine() {
        assert_eq!(RuleConfig::default().to_rules(), AlertRules::default());
    }

    #[test]
    fn inverted_thresholds_fail_validation() {
        let rules = RuleConfig {
            alert_above: 80,
            critical_above: 70,
            overcrowding_above: 10,
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn scores_above_one_hundred_fail_validation() {
        let rules = RuleConfig {
            alert_above: 75,
            critical_above: 101,
            overcrowding_above: 10,
        };
        assert!(rules.validate().is_err());
    }
}
