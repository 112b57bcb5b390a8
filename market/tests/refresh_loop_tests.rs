use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use parking_lot::Mutex;
use tokio::sync::{Notify, mpsc};
use tracing_test::traced_test;

use market::{
    ChainReadError, ChainReader, FeeBps, MarketView, OraclePrice, OracleReading, RefreshLoop,
};

const EVERY: Duration = Duration::from_secs(10);

fn reading(price: i64) -> OracleReading {
    OracleReading {
        fee_bps: FeeBps::new(30).unwrap(),
        price: OraclePrice::new(BigDecimal::from(price)).unwrap(),
    }
}

fn prices(view: &MarketView) -> Vec<String> {
    view.history().iter().map(|s| s.price.to_string()).collect()
}

/// Returns 1, 2, 3, ... on successive reads.
#[derive(Default)]
struct CountingReader {
    calls: AtomicUsize,
}

#[async_trait]
impl ChainReader for CountingReader {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(reading(n as i64))
    }
}

/// Plays back a fixed script, then fails forever.
struct ScriptedReader {
    script: Mutex<VecDeque<Result<OracleReading, ChainReadError>>>,
}

impl ScriptedReader {
    fn new(script: Vec<Result<OracleReading, ChainReadError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl ChainReader for ScriptedReader {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError> {
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ChainReadError::Transport("script exhausted".into())))
    }
}

/// Signals each dispatched read and blocks until released.
struct GatedReader {
    dispatched: mpsc::UnboundedSender<()>,
    release: Arc<Notify>,
}

#[async_trait]
impl ChainReader for GatedReader {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError> {
        let _ = self.dispatched.send(());
        self.release.notified().await;
        Ok(reading(42))
    }
}

/// Takes 25s per read and records the peak number of concurrent reads.
#[derive(Default)]
struct SlowReader {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl ChainReader for SlowReader {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(25)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(reading(1))
    }
}

#[tokio::test(start_paused = true)]
async fn history_keeps_the_ten_most_recent_samples() {
    let reader = Arc::new(CountingReader::default());
    let view = MarketView::default();

    let handle = RefreshLoop::start(reader.clone(), view.clone(), EVERY);

    // Ticks at 0s, 10s, ..., 140s.
    tokio::time::sleep(Duration::from_secs(145)).await;

    assert_eq!(reader.calls.load(Ordering::SeqCst), 15);
    assert_eq!(
        prices(&view),
        (6..=15).map(|p| p.to_string()).collect::<Vec<_>>()
    );

    let history = view.history().to_vec();
    assert!(history.windows(2).all(|w| w[0].at <= w[1].at));
    assert_eq!(view.latest().unwrap().price.to_string(), "15");

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn read_resolving_after_stop_is_discarded() {
    let (tx, mut dispatched) = mpsc::unbounded_channel();
    let release = Arc::new(Notify::new());
    let reader = Arc::new(GatedReader {
        dispatched: tx,
        release: release.clone(),
    });
    let view = MarketView::default();

    let handle = RefreshLoop::start(reader, view.clone(), EVERY);

    dispatched.recv().await.expect("first read dispatched");
    handle.stop();
    release.notify_waiters();

    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(view.history().is_empty());
    assert!(view.latest().is_none());
    assert!(!handle.is_active());
    assert!(dispatched.try_recv().is_err(), "no tick after stop");
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn failed_reads_keep_last_known_values() {
    let reader = Arc::new(ScriptedReader::new(vec![
        Ok(reading(100)),
        Err(ChainReadError::Transport("connection reset".into())),
        Err(ChainReadError::Reverted("oracle stale".into())),
        Ok(reading(200)),
    ]));
    let view = MarketView::default();

    let _handle = RefreshLoop::start(reader, view.clone(), EVERY);

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(view.latest().unwrap().price.to_string(), "100");
    assert_eq!(view.consecutive_failures(), 2);
    assert_eq!(prices(&view), vec!["100"]);
    assert!(logs_contain("chain read failed"));
    assert!(!logs_contain("chain read keeps failing"));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(view.latest().unwrap().price.to_string(), "200");
    assert_eq!(view.consecutive_failures(), 0);
    assert_eq!(prices(&view), vec!["100", "200"]);

    // The script is exhausted; the loop keeps retrying without giving up.
    tokio::time::sleep(Duration::from_secs(100)).await;
    assert_eq!(view.consecutive_failures(), 10);
    assert_eq!(view.latest().unwrap().price.to_string(), "200");
    assert!(logs_contain("chain read keeps failing"));
}

#[tokio::test(start_paused = true)]
async fn reads_never_overlap() {
    let reader = Arc::new(SlowReader::default());
    let view = MarketView::default();

    let _handle = RefreshLoop::start(reader.clone(), view.clone(), EVERY);

    tokio::time::sleep(Duration::from_secs(90)).await;

    assert_eq!(reader.peak.load(Ordering::SeqCst), 1);
    // Reads start at 0s, 25s, 50s and 75s: one late tick fires right away,
    // the rest of the missed ticks are skipped.
    assert_eq!(reader.calls.load(Ordering::SeqCst), 4);
    assert_eq!(view.history().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn restart_switches_reader_and_forgets_stale_snapshot() {
    let first = Arc::new(ScriptedReader::new(vec![Ok(reading(100))]));
    let second = Arc::new(ScriptedReader::new(vec![Ok(reading(250))]));
    let view = MarketView::default();

    let mut handle = RefreshLoop::start(first, view.clone(), EVERY);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(view.latest().unwrap().price.to_string(), "100");
    let old_generation = handle.generation();

    handle.restart(second, EVERY);
    assert!(view.latest().is_none());
    assert!(handle.generation() > old_generation);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(view.latest().unwrap().price.to_string(), "250");
    assert_eq!(prices(&view), vec!["100", "250"]);
    assert!(handle.is_active());
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_drop_stops_the_loop() {
    let reader = Arc::new(CountingReader::default());
    let view = MarketView::default();

    let handle = RefreshLoop::start(reader.clone(), view.clone(), EVERY);
    tokio::time::sleep(Duration::from_secs(1)).await;

    handle.stop();
    handle.stop();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(reader.calls.load(Ordering::SeqCst), 1);

    let handle = RefreshLoop::start(reader.clone(), view.clone(), EVERY);
    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(handle);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(reader.calls.load(Ordering::SeqCst), 2);
    assert_eq!(view.history().len(), 2);
}
