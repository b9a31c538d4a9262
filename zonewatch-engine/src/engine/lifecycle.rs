//! Engine lifecycle: the Idle/Running state machine that owns the scheduler.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use zonewatch_config::ZonewatchConfig;
use zonewatch_core::alerts::{AlertStore, DEFAULT_ALERT_CAPACITY};
use zonewatch_core::collaborators::{Analyzer, FailureSink, FrameSource};
use zonewatch_core::error::ZoneError;
use zonewatch_core::history::{HistoryStore, DEFAULT_HISTORY_CAPACITY};
use zonewatch_core::model::ZoneId;
use zonewatch_core::monitor::MonitorState;
use zonewatch_core::rules::AlertRules;
use zonewatch_core::time::{Clock, IdSource, RandomIds, SystemClock};
use zonewatch_core::zones::ZoneRegistry;
use zonewatch_telemetry::{MetricsRecorder, TracingFailureSink};

use super::cycle::Shared;
use super::error::EngineError;
use super::scheduler::{run_ticker, Ticker};
use super::status::{EngineState, EngineStatus, OperationalPicture, Transition};

const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);
const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_millis(15_000);
const DEFAULT_ZONE: &str = "main";

/// Owns the operational picture and the scheduler that feeds it.
///
/// Presentation code drives it with [`Engine::start`] / [`Engine::stop`] and
/// reads through [`Engine::picture`] or [`Engine::subscribe`]; it never gets
/// mutable access to the stores.
pub struct Engine {
    shared: Arc<Shared>,
    interval: Duration,
    cycle_limit: Option<u64>,
}

impl Engine {
    pub fn builder(frames: Arc<dyn FrameSource>, analyzer: Arc<dyn Analyzer>) -> EngineBuilder {
        EngineBuilder::new(frames, analyzer)
    }

    /// Idle → Running. Calling it while Running is a no-op.
    #[instrument(level = "info", name = "engine_start", skip(self))]
    pub fn start(&self) -> Result<Transition, EngineError> {
        let mut ticker = self.shared.ticker.lock();
        if ticker.is_some() {
            info!("Start ignored: engine already running");
            return Ok(Transition::AlreadyRunning);
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let token = CancellationToken::new();
        let handle = runtime.spawn(run_ticker(
            self.shared.clone(),
            self.interval,
            token.clone(),
            self.cycle_limit,
        ));
        *ticker = Some(Ticker { token, handle });

        self.shared
            .status
            .send_modify(|status| status.state = EngineState::Running);
        info!("Engine running");
        Ok(Transition::Started)
    }

    /// Running → Idle. The state flips as soon as the scheduler is detached,
    /// so a concurrent [`Engine::start`] is always reflected. Once this
    /// returns, the detached scheduler launches nothing more; a cycle already
    /// in flight may still finish and record its result.
    #[instrument(level = "info", name = "engine_stop", skip(self))]
    pub async fn stop(&self) -> Transition {
        let detached = {
            let mut slot = self.shared.ticker.lock();
            let detached = slot.take();
            if let Some(ticker) = &detached {
                ticker.token.cancel();
                self.shared
                    .status
                    .send_modify(|status| status.state = EngineState::Idle);
            }
            detached
        };
        let Some(Ticker { handle, .. }) = detached else {
            info!("Stop ignored: engine already idle");
            return Transition::AlreadyIdle;
        };

        if let Err(e) = handle.await {
            error!("Scheduler task ended abnormally: {e}");
        }
        info!("Engine idle");
        Transition::Stopped
    }

    pub fn state(&self) -> EngineState {
        self.shared.status.borrow().state
    }

    pub fn status(&self) -> EngineStatus {
        self.shared.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineStatus> {
        self.shared.status.subscribe()
    }

    pub fn picture(&self) -> OperationalPicture {
        let status = self.status();
        let monitor = self.shared.monitor.lock();
        let zones = monitor.zones();
        let zone = zones.current().clone();
        let zone_name = zones
            .get(&zone)
            .map(|data| data.name().to_string())
            .unwrap_or_else(|| zone.to_string());

        OperationalPicture {
            status,
            zone,
            zone_name,
            latest: monitor.latest().cloned(),
            history: monitor.history(),
            alerts: monitor.alerts(),
        }
    }

    /// Attributes subsequent results and alerts to `zone`.
    pub fn select_zone(&self, zone: &ZoneId) -> Result<(), ZoneError> {
        self.shared.monitor.lock().select_zone(zone)?;
        info!("Current zone is now {}", zone);
        Ok(())
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.shared.metrics.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

pub struct EngineBuilder {
    frames: Arc<dyn FrameSource>,
    analyzer: Arc<dyn Analyzer>,
    failures: Option<Arc<dyn FailureSink>>,
    metrics: Option<Arc<MetricsRecorder>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
    rules: AlertRules,
    interval: Duration,
    analysis_timeout: Duration,
    history_capacity: usize,
    alert_capacity: usize,
    zones: Option<ZoneRegistry>,
    cycle_limit: Option<u64>,
}

impl EngineBuilder {
    fn new(frames: Arc<dyn FrameSource>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            frames,
            analyzer,
            failures: None,
            metrics: None,
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIds),
            rules: AlertRules::default(),
            interval: DEFAULT_INTERVAL,
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            zones: None,
            cycle_limit: None,
        }
    }

    /// Applies the sampling, store, rule and zone sections.
    pub fn config(mut self, config: &ZonewatchConfig) -> Result<Self, EngineError> {
        self.interval = config.sampling.interval();
        self.analysis_timeout = config.sampling.analysis_timeout();
        self.history_capacity = config.stores.history_capacity;
        self.alert_capacity = config.stores.alert_capacity;
        self.rules = config.rules.to_rules();
        self.zones = Some(config.zones.to_registry(config.stores.history_capacity)?);
        Ok(self)
    }

    pub fn failure_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.failures = Some(sink);
        self
    }

    pub fn metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn rules(mut self, rules: AlertRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    pub fn capacities(mut self, history: usize, alerts: usize) -> Self {
        self.history_capacity = history;
        self.alert_capacity = alerts;
        self
    }

    pub fn zones(mut self, zones: ZoneRegistry) -> Self {
        self.zones = Some(zones);
        self
    }

    /// Stop launching cycles after `limit` have been started.
    pub fn cycle_limit(mut self, limit: u64) -> Self {
        self.cycle_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<Engine, EngineError> {
        if self.history_capacity == 0 {
            return Err(EngineError::Capacity("history capacity"));
        }
        if self.alert_capacity == 0 {
            return Err(EngineError::Capacity("alert capacity"));
        }

        let metrics = match self.metrics {
            Some(metrics) => metrics,
            None => Arc::new(MetricsRecorder::new()?),
        };
        let failures = self
            .failures
            .unwrap_or_else(|| Arc::new(TracingFailureSink::new(metrics.clone())));
        let zones = match self.zones {
            Some(zones) => zones,
            None => ZoneRegistry::new(
                ZoneId::parse(DEFAULT_ZONE)?,
                "Main area",
                self.history_capacity,
            ),
        };

        let monitor = MonitorState::new(
            HistoryStore::with_capacity(self.history_capacity),
            AlertStore::with_capacity(self.alert_capacity),
            zones,
        );
        let (status, _) = watch::channel(EngineStatus::default());

        Ok(Engine {
            shared: Arc::new(Shared {
                monitor: Mutex::new(monitor),
                rules: self.rules,
                frames: self.frames,
                analyzer: self.analyzer,
                failures,
                metrics,
                clock: self.clock,
                ids: self.ids,
                analysis_timeout: self.analysis_timeout,
                busy: AtomicBool::new(false),
                status,
                ticker: Mutex::new(None),
            }),
            interval: self.interval,
            cycle_limit: self.cycle_limit,
        })
    }
}
