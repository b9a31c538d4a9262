//! Value types shared by every zonewatch component.
//!
//! [`AnalysisReport`] is what an analyzer hands back; it becomes an
//! [`AnalysisResult`] only after [`AnalysisReport::accept`] has checked the
//! value invariants. Results and alerts are immutable once built.

use std::fmt;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidResult, ZoneError};

/// Highest accepted risk score.
pub const MAX_RISK_SCORE: u8 = 100;

/// Crowd density classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Density {
    Low,
    Medium,
    High,
    Critical,
}

/// Traffic flow classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    Smooth,
    Moderate,
    Congested,
    Stalled,
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Unvalidated analyzer output. Counts and score are signed so that
/// out-of-range values survive decoding and can be rejected explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub people_count: i64,
    pub vehicle_count: i64,
    pub density: Density,
    pub flow: Flow,
    pub risk_score: i64,
    pub summary: String,
    pub prediction: String,
}

impl AnalysisReport {
    /// Checks the value invariants and stamps the report with its acceptance time.
    pub fn accept(self, timestamp: DateTime<Utc>) -> Result<AnalysisResult, InvalidResult> {
        let people_count = count("people_count", self.people_count)?;
        let vehicle_count = count("vehicle_count", self.vehicle_count)?;

        if !(0..=i64::from(MAX_RISK_SCORE)).contains(&self.risk_score) {
            return Err(InvalidResult::RiskScoreOutOfRange(self.risk_score));
        }

        Ok(AnalysisResult {
            people_count,
            vehicle_count,
            density: self.density,
            flow: self.flow,
            risk_score: self.risk_score as u8,
            summary: self.summary,
            prediction: self.prediction,
            timestamp,
        })
    }
}

fn count(field: &'static str, value: i64) -> Result<u32, InvalidResult> {
    if value < 0 {
        return Err(InvalidResult::NegativeCount { field, value });
    }
    u32::try_from(value).map_err(|_| InvalidResult::CountOverflow { field, value })
}

/// One accepted observation of the monitored area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    people_count: u32,
    vehicle_count: u32,
    density: Density,
    flow: Flow,
    risk_score: u8,
    summary: String,
    prediction: String,
    timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn people_count(&self) -> u32 {
        self.people_count
    }

    pub fn vehicle_count(&self) -> u32 {
        self.vehicle_count
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn prediction(&self) -> &str {
        &self.prediction
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Alert identifier, unique for the lifetime of the id source that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    Congestion,
    Overcrowding,
    SafetyRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Critical,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Congestion => "CONGESTION",
            AlertKind::Overcrowding => "OVERCROWDING",
            AlertKind::SafetyRisk => "SAFETY_RISK",
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert derived from a single result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    id: AlertId,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: AlertKind,
    severity: Severity,
    message: String,
    zone: ZoneId,
}

impl Alert {
    pub fn new(
        id: AlertId,
        timestamp: DateTime<Utc>,
        kind: AlertKind,
        severity: Severity,
        message: String,
        zone: ZoneId,
    ) -> Self {
        Self {
            id,
            timestamp,
            kind,
            severity,
            message,
            zone,
        }
    }

    pub fn id(&self) -> &AlertId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }
}

lazy_static! {
    static ref ZONE_ID: Regex = Regex::new("^[a-z0-9][a-z0-9_-]{0,63}$").expect("zone id pattern");
}

/// Identifier of a monitored area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneId(String);

impl ZoneId {
    pub fn parse(id: impl Into<String>) -> Result<Self, ZoneError> {
        let id = id.into();
        if ZONE_ID.is_match(&id) {
            Ok(Self(id))
        } else {
            Err(ZoneError::InvalidId(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ZoneId {
    type Error = ZoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ZoneId::parse(value)
    }
}

impl From<ZoneId> for String {
    fn from(id: ZoneId) -> Self {
        id.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn accepts_boundary_scores() {
        assert_eq!(report(0, 0).accept(at(0)).unwrap().risk_score(), 0);
        assert_eq!(report(100, 0).accept(at(0)).unwrap().risk_score(), 100);
    }

    #[test]
    fn rejects_out_of_range_score() {
        assert_eq!(
            report(101, 1).accept(at(0)),
            Err(InvalidResult::RiskScoreOutOfRange(101))
        );
        assert_eq!(
            report(-1, 1).accept(at(0)),
            Err(InvalidResult::RiskScoreOutOfRange(-1))
        );
    }

    #[test]
    fn rejects_negative_counts() {
        let mut r = report(10, 1);
        r.vehicle_count = -4;
        assert_eq!(
            r.accept(at(0)),
            Err(InvalidResult::NegativeCount {
                field: "vehicle_count",
                value: -4
            })
        );
        assert!(matches!(
            report(10, -1).accept(at(0)),
            Err(InvalidResult::NegativeCount {
                field: "people_count",
                ..
            })
        ));
    }

    #[test]
    fn timestamp_is_assigned_at_acceptance() {
        let accepted = report(10, 1).accept(at(42)).unwrap();
        assert_eq!(accepted.timestamp(), at(42));
    }

    #[test]
    fn decodes_wire_report() {
        let json = r#"{
            "peopleCount": 12, "vehicleCount": 3, "density": "High", "flow": "Congested",
            "riskScore": 81, "summary": "Busy", "prediction": "Busier"
        }"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.density, Density::High);
        assert_eq!(report.flow, Flow::Congested);
    }

    #[test]
    fn unknown_density_is_a_decode_error() {
        let json = r#"{
            "peopleCount": 1, "vehicleCount": 0, "density": "Extreme", "flow": "Smooth",
            "riskScore": 1, "summary": "", "prediction": ""
        }"#;
        assert!(serde_json::from_str::<AnalysisReport>(json).is_err());
    }

    #[test]
    fn alert_kinds_use_wire_names() {
        assert_eq!(
            serde_json::to_string(&AlertKind::SafetyRisk).unwrap(),
            "\"SAFETY_RISK\""
        );
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn zone_ids_are_validated() {
        assert!(ZoneId::parse("main").is_ok());
        assert!(ZoneId::parse("gate-3_north").is_ok());
        assert!(ZoneId::parse("").is_err());
        assert!(ZoneId::parse("Main Hall").is_err());
        assert!(serde_json::from_str::<ZoneId>("\"bad id\"").is_err());
    }
}
