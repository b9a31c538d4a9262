//! Threshold rule that turns a single result into at most one alert.

use serde::{Deserialize, Serialize};

use crate::model::{Alert, AlertKind, AnalysisResult, Severity, ZoneId};
use crate::time::{Clock, IdSource};

/// Zone the caller is currently attributing observations to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneContext {
    pub current_zone: ZoneId,
}

impl ZoneContext {
    pub fn new(current_zone: ZoneId) -> Self {
        Self { current_zone }
    }
}

/// Alerting thresholds. All comparisons are strictly greater-than.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRules {
    /// Scores above this raise an alert.
    pub alert_above: u8,
    /// Scores above this raise a critical alert.
    pub critical_above: u8,
    /// People counts above this make the alert an overcrowding alert.
    pub overcrowding_above: u32,
}

impl Default for AlertRules {
    fn default() -> Self {
        Self {
            alert_above: 75,
            critical_above: 90,
            overcrowding_above: 10,
        }
    }
}

impl AlertRules {
    /// Classifies `result` without allocating an alert.
    pub fn classify(&self, result: &AnalysisResult) -> Option<(AlertKind, Severity)> {
        if result.risk_score() <= self.alert_above {
            return None;
        }

        let kind = if result.people_count() > self.overcrowding_above {
            AlertKind::Overcrowding
        } else {
            AlertKind::Congestion
        };

        let severity = if result.risk_score() > self.critical_above {
            Severity::Critical
        } else {
            Severity::Warning
        };

        Some((kind, severity))
    }

    /// Derives the alert for `result`, if any. The id and timestamp come
    /// from the supplied sources; stores are never touched.
    pub fn evaluate(
        &self,
        result: &AnalysisResult,
        zone: &ZoneContext,
        ids: &dyn IdSource,
        clock: &dyn Clock,
    ) -> Option<Alert> {
        let (kind, severity) = self.classify(result)?;
        let message = format!("{}. Prediction: {}", result.summary(), result.prediction());

        Some(Alert::new(
            ids.next_id(),
            clock.now(),
            kind,
            severity,
            message,
            zone.current_zone.clone(),
        ))
    }
}
