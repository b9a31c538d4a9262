//! The memory-resident operational picture and its single write path.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::alerts::AlertStore;
use crate::error::{InvalidResult, ZoneError};
use crate::history::HistoryStore;
use crate::model::{Alert, AnalysisReport, AnalysisResult, ZoneId};
use crate::rules::AlertRules;
use crate::time::{Clock, IdSource};
use crate::zones::ZoneRegistry;

/// What one successful ingest produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    pub result: AnalysisResult,
    pub alert: Option<Alert>,
}

/// Pins alert time to the clamped acceptance time of the triggering result.
struct AcceptedAt(DateTime<Utc>);

impl Clock for AcceptedAt {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// History, alerts and zones for one monitoring pipeline.
#[derive(Debug, Clone)]
pub struct MonitorState {
    history: HistoryStore,
    alerts: AlertStore,
    zones: ZoneRegistry,
}

impl MonitorState {
    pub fn new(history: HistoryStore, alerts: AlertStore, zones: ZoneRegistry) -> Self {
        Self {
            history,
            alerts,
            zones,
        }
    }

    /// Validates `report`, stores the result and any alert it triggers.
    ///
    /// Nothing is stored when validation fails. The acceptance timestamp
    /// never goes below the newest stored result.
    pub fn ingest(
        &mut self,
        report: AnalysisReport,
        rules: &AlertRules,
        ids: &dyn IdSource,
        clock: &dyn Clock,
    ) -> Result<Ingested, InvalidResult> {
        let timestamp = self.acceptance_time(clock.now());
        let result = report.accept(timestamp)?;
        let alert = rules.evaluate(&result, &self.zones.context(), ids, &AcceptedAt(timestamp));

        self.history.append(result.clone());
        self.zones.record(result.clone());
        if let Some(alert) = &alert {
            self.alerts.record(alert.clone());
        }

        Ok(Ingested { result, alert })
    }

    fn acceptance_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.history.latest() {
            Some(latest) if latest.timestamp() > now => latest.timestamp(),
            _ => now,
        }
    }

    pub fn select_zone(&mut self, id: &ZoneId) -> Result<(), ZoneError> {
        self.zones.select(id)
    }

    pub fn history(&self) -> Arc<[AnalysisResult]> {
        self.history.snapshot()
    }

    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.history.latest()
    }

    pub fn alerts(&self) -> Arc<[Alert]> {
        self.alerts.all()
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{at, report};
    use crate::time::{ManualClock, SequentialIds};
    use std::time::Duration;

    fn state() -> MonitorState {
        MonitorState::new(
            HistoryStore::default(),
            AlertStore::default(),
            ZoneRegistry::new(ZoneId::parse("main").unwrap(), "Main", 20),
        )
    }

    #[test]
    fn quiet_result_is_stored_without_alert() {
        let mut state = state();
        let clock = ManualClock::new(at(0));
        let ingested = state
            .ingest(report(50, 3), &AlertRules::default(), &SequentialIds::new(), &clock)
            .unwrap();

        assert!(ingested.alert.is_none());
        assert_eq!(state.history().len(), 1);
        assert!(state.alerts().is_empty());
    }

    #[test]
    fn risky_result_is_stored_with_alert() {
        let mut state = state();
        let clock = ManualClock::new(at(0));
        let ingested = state
            .ingest(report(95, 15), &AlertRules::default(), &SequentialIds::new(), &clock)
            .unwrap();

        assert!(ingested.alert.is_some());
        assert_eq!(state.alerts().len(), 1);
        assert_eq!(state.alerts()[0].zone().as_str(), "main");
        let zone = state.zones().get(&ZoneId::parse("main").unwrap()).unwrap();
        assert_eq!(zone.history().len(), 1);
    }

    #[test]
    fn invalid_report_leaves_state_untouched() {
        let mut state = state();
        let clock = ManualClock::new(at(0));
        let err = state
            .ingest(report(120, 15), &AlertRules::default(), &SequentialIds::new(), &clock)
            .unwrap_err();

        assert_eq!(err, InvalidResult::RiskScoreOutOfRange(120));
        assert!(state.history().is_empty());
        assert!(state.alerts().is_empty());
    }

    #[test]
    fn timestamps_never_regress() {
        let mut state = state();
        let clock = ManualClock::new(at(100));
        let rules = AlertRules::default();
        let ids = SequentialIds::new();

        state.ingest(report(10, 1), &rules, &ids, &clock).unwrap();
        clock.set(at(40));
        let second = state.ingest(report(10, 2), &rules, &ids, &clock).unwrap();
        assert_eq!(second.result.timestamp(), at(100));

        clock.advance(Duration::from_secs(120));
        let third = state.ingest(report(10, 3), &rules, &ids, &clock).unwrap();
        assert_eq!(third.result.timestamp(), at(160));
    }

    #[test]
    fn alert_time_matches_its_clamped_result() {
        let mut state = state();
        let clock = ManualClock::new(at(100));
        let rules = AlertRules::default();
        let ids = SequentialIds::new();

        state.ingest(report(10, 1), &rules, &ids, &clock).unwrap();
        clock.set(at(40));
        let risky = state.ingest(report(95, 15), &rules, &ids, &clock).unwrap();

        let alert = risky.alert.unwrap();
        assert_eq!(risky.result.timestamp(), at(100));
        assert_eq!(alert.timestamp(), risky.result.timestamp());
        assert_eq!(state.alerts()[0].timestamp(), at(100));
    }
}
