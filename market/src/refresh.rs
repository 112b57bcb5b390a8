//! Market refresh loop
//!
//! Periodically reads `(fee, price)` from the chain reader and commits it
//! into the `MarketView` together with a history sample.
//!
//! Reads are strictly sequential: a tick that comes due while a read is
//! still pending is skipped. Stopping a loop retires its generation under
//! the view's lock, so a read that resolves afterwards is dropped.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::logger::warn_if_slow;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::reader::ChainReader;
use crate::types::MarketSnapshot;
use crate::view::MarketView;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Consecutive failures after which read errors are logged at error level.
const FAILURE_ESCALATION: u32 = 5;

/// Reads slower than this are reported under the `performance` target.
const SLOW_READ: Duration = Duration::from_secs(3);

pub struct RefreshLoop;

impl RefreshLoop {
    /// Spawn a loop that reads immediately and then every `every`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(reader: Arc<dyn ChainReader>, view: MarketView, every: Duration) -> RefreshHandle {
        let (generation, task) = spawn(reader, view.clone(), every, false);
        RefreshHandle {
            generation,
            view,
            task,
        }
    }
}

fn spawn(
    reader: Arc<dyn ChainReader>,
    view: MarketView,
    every: Duration,
    forget_latest: bool,
) -> (u64, JoinHandle<()>) {
    let every = every.max(Duration::from_millis(1));
    let generation = view.begin_generation(forget_latest);

    let span = info_span!("refresh_loop", generation);
    let task = tokio::spawn(run(reader, view, every, generation).instrument(span));
    (generation, task)
}

/// Owner of a running refresh loop. Dropping it stops the loop.
pub struct RefreshHandle {
    generation: u64,
    view: MarketView,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &MarketView {
        &self.view
    }

    /// Stop the loop. Safe to call repeatedly; never touches a newer
    /// generation started on the same view.
    pub fn stop(&self) {
        if self.view.retire(self.generation) {
            info!(generation = self.generation, "refresh loop stopped");
        }
        self.task.abort();
    }

    /// Stop the current loop and start over against `reader`.
    ///
    /// The last snapshot belongs to the old reader and is dropped; the price
    /// history is kept.
    pub fn restart(&mut self, reader: Arc<dyn ChainReader>, every: Duration) {
        self.stop();
        let (generation, task) = spawn(reader, self.view.clone(), every, true);
        self.generation = generation;
        self.task = task;
    }

    pub fn is_active(&self) -> bool {
        self.view.is_current(self.generation) && !self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(reader: Arc<dyn ChainReader>, view: MarketView, every: Duration, generation: u64) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(every_ms = every.as_millis() as u64, "refresh loop started");

    loop {
        ticker.tick().await;

        if !view.is_current(generation) {
            break;
        }

        match warn_if_slow("read_fee_and_price", SLOW_READ, reader.read_fee_and_price()).await {
            Ok(reading) => {
                let snapshot = MarketSnapshot::observed(reading, Utc::now());
                let fee_bps = snapshot.fee_bps;
                let price = snapshot.price.to_string();

                if !view.commit(generation, snapshot) {
                    debug!("loop retired while reading; result discarded");
                    break;
                }
                debug!(fee_bps = fee_bps.bps(), %price, "market snapshot committed");
            }
            Err(e) => match view.record_failure(generation) {
                None => break,
                Some(n) if n >= FAILURE_ESCALATION => {
                    error!(error = %e, consecutive_failures = n, "chain read keeps failing; keeping last known values")
                }
                Some(n) => {
                    warn!(error = %e, consecutive_failures = n, "chain read failed; keeping last known values")
                }
            },
        }
    }

    debug!("refresh loop exited");
}
