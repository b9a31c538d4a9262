//! Free-running ticker that launches sampling cycles.
//!
//! Ticks are anchored to the schedule (`start + n * T`), never to cycle
//! completion. A tick that lands while a cycle is still in flight is skipped.
//! A ticker that reaches its cycle limit detaches itself and leaves the
//! engine Idle, so a later start resumes sampling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, Instrument};

use super::cycle::{run_cycle, Shared};
use super::status::EngineState;

/// A spawned ticker task and the token that stops it.
pub(crate) struct Ticker {
    pub(crate) token: CancellationToken,
    pub(crate) handle: JoinHandle<()>,
}

/// Clears the busy flag when the cycle task ends, even if it panics.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub(crate) async fn run_ticker(
    shared: Arc<Shared>,
    period: Duration,
    token: CancellationToken,
    cycle_limit: Option<u64>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut launched: u64 = 0;

    info!("Scheduler started with a {:?} interval", period);
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if shared
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Tick skipped: previous cycle still in flight");
            shared.metrics.ticks_skipped.inc();
            shared
                .status
                .send_modify(|status| status.counters.skipped += 1);
            continue;
        }

        launched += 1;
        trace!("Launching cycle {}", launched);
        let cycle_shared = shared.clone();
        let cycle_token = token.clone();
        tokio::spawn(
            async move {
                let _busy = BusyGuard(&cycle_shared.busy);
                // Spawned but not yet polled when stop() ran.
                if cycle_token.is_cancelled() {
                    return;
                }
                run_cycle(&cycle_shared).await;
            }
            .instrument(tracing::debug_span!("cycle", n = launched)),
        );

        if cycle_limit.is_some_and(|limit| launched >= limit) {
            info!("Cycle limit of {} reached", launched);
            retire(&shared, &token);
            break;
        }
    }
    debug!("Scheduler exited after launching {} cycles", launched);
}

/// Empties the ticker slot and publishes Idle. A cancelled token means
/// `stop()` already did both under the same lock.
fn retire(shared: &Shared, token: &CancellationToken) {
    let mut slot = shared.ticker.lock();
    if token.is_cancelled() {
        return;
    }
    // Dropping our own handle only detaches this task.
    slot.take();
    shared
        .status
        .send_modify(|status| status.state = EngineState::Idle);
}
