//! Plain-text dashboard for the operational picture.

use std::fmt;

use zonewatch_core::model::AnalysisResult;
use zonewatch_engine::OperationalPicture;

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders one [`OperationalPicture`] as a block of text.
pub struct Dashboard<'a>(pub &'a OperationalPicture);

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let picture = self.0;
        let status = &picture.status;
        let counters = status.counters;

        writeln!(
            f,
            "Zone: {} ({})  State: {}",
            picture.zone_name,
            picture.zone.as_str(),
            status.state
        )?;
        writeln!(
            f,
            "Cycles: {} completed, {} failed, {} skipped  Alerts raised: {}",
            counters.completed, counters.failed, counters.skipped, counters.alerts
        )?;

        if let Some(failure) = &status.last_failure {
            writeln!(
                f,
                "!! {} at {}: {}",
                failure.kind,
                failure.timestamp.format("%H:%M:%S"),
                failure.message
            )?;
        }

        match &picture.latest {
            Some(latest) => {
                writeln!(
                    f,
                    "Latest [{}]: risk {}  people {}  vehicles {}  density {}  flow {}",
                    latest.timestamp().format("%H:%M:%S"),
                    latest.risk_score(),
                    latest.people_count(),
                    latest.vehicle_count(),
                    latest.density(),
                    latest.flow()
                )?;
                writeln!(f, "  {}", latest.summary())?;
                writeln!(f, "  Prediction: {}", latest.prediction())?;
            }
            None => writeln!(f, "Latest: no analysis yet")?,
        }

        if !picture.history.is_empty() {
            writeln!(f, "Risk trend: {}", sparkline(&picture.history))?;
        }

        if picture.alerts.is_empty() {
            return writeln!(f, "Alerts: none");
        }
        writeln!(f, "Alerts:")?;
        for alert in picture.alerts.iter() {
            writeln!(
                f,
                "  {} [{}] {} {}",
                alert.timestamp().format("%H:%M:%S"),
                alert.severity(),
                alert.kind(),
                alert.message()
            )?;
        }
        Ok(())
    }
}

/// One bar per result, oldest first, scaled over the 0..=100 risk range.
pub fn sparkline(history: &[AnalysisResult]) -> String {
    history
        .iter()
        .map(|result| SPARKS[usize::from(result.risk_score()) * (SPARKS.len() - 1) / 100])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use zonewatch_core::collaborators::{FailureKind, FailureReport};
    use zonewatch_core::model::{
        Alert, AlertId, AlertKind, AnalysisReport, Density, Flow, Severity, ZoneId,
    };
    use zonewatch_engine::EngineStatus;

    fn result(risk_score: i64, people_count: i64) -> AnalysisResult {
        AnalysisReport {
            people_count,
            vehicle_count: 2,
            density: Density::High,
            flow: Flow::Congested,
            risk_score,
            summary: "Queue building at the north gate".into(),
            prediction: "Worsening".into(),
        }
        .accept(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        .unwrap()
    }

    fn picture(history: Vec<AnalysisResult>, alerts: Vec<Alert>) -> OperationalPicture {
        OperationalPicture {
            status: EngineStatus::default(),
            zone: ZoneId::parse("main").unwrap(),
            zone_name: "Main area".into(),
            latest: history.last().cloned(),
            history: history.into(),
            alerts: alerts.into(),
        }
    }

    #[test]
    fn sparkline_spans_the_risk_range() {
        assert_eq!(sparkline(&[result(0, 1), result(50, 1), result(100, 1)]), "▁▄█");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn empty_picture_says_so() {
        let text = Dashboard(&picture(vec![], vec![])).to_string();
        assert!(text.contains("Zone: Main area (main)  State: Idle"));
        assert!(text.contains("Latest: no analysis yet"));
        assert!(text.contains("Alerts: none"));
        assert!(!text.contains("Risk trend"));
    }

    #[test]
    fn latest_result_and_alerts_are_shown() {
        let alert = Alert::new(
            AlertId::new("alert-000001"),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap(),
            AlertKind::Overcrowding,
            Severity::Critical,
            "Queue building at the north gate. Prediction: Worsening".into(),
            ZoneId::parse("main").unwrap(),
        );
        let text = Dashboard(&picture(vec![result(40, 3), result(95, 14)], vec![alert])).to_string();

        assert!(text.contains("risk 95  people 14  vehicles 2  density High  flow Congested"));
        assert!(text.contains("Prediction: Worsening"));
        assert!(text.contains("Risk trend: ▃▇"));
        assert!(text.contains("12:00:01 [CRITICAL] OVERCROWDING Queue building"));
    }

    #[test]
    fn failure_banner_is_shown() {
        let mut picture = picture(vec![], vec![]);
        picture.status.last_failure = Some(FailureReport {
            kind: FailureKind::AnalysisServiceError,
            message: "analysis timed out".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 5).unwrap(),
        });

        let text = Dashboard(&picture).to_string();
        assert!(text.contains("!! analysis_service_error at 12:00:05: analysis timed out"));
    }
}
