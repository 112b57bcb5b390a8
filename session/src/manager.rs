use std::sync::Arc;
use std::time::Duration;

use common::logger::{TraceId, root_span};
use tokio::sync::watch;
use tracing::{Instrument, info, warn};

use executor::{ChainWriter, ExecutionError, SwapExecutor, SwapReceipt};
use market::price_history::PriceHistory;
use market::{
    ChainReader, MarketSnapshot, MarketView, QuoteEngine, QuoteError, RefreshHandle, RefreshLoop,
    SwapQuote,
};

use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::model::{SwapStatus, WalletInfo};
use crate::wallet::WalletSession;

/// Failure reason recorded when a swap future is dropped mid-flight.
pub const CANCELLED: &str = "cancelled";

/// Explicit owner of everything a connected swap screen needs.
///
/// Holds the reader/writer handles and the refresh loop; the quote engine
/// and the loop only see what the session passes them. Dropping the session
/// stops the loop and clears the price history.
pub struct SwapSession {
    config: SessionConfig,
    wallet: WalletInfo,
    engine: QuoteEngine,
    executor: SwapExecutor,
    view: MarketView,
    refresh: RefreshHandle,
    status: watch::Sender<SwapStatus>,
}

impl SwapSession {
    /// Validate the wallet's network and start refreshing market data.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn connect(
        config: SessionConfig,
        wallet: &dyn WalletSession,
        reader: Arc<dyn ChainReader>,
        writer: Arc<dyn ChainWriter>,
    ) -> Result<Self, SessionError> {
        let chain_id = wallet.chain_id().await?;
        if chain_id != config.expected_chain_id {
            warn!(
                expected = config.expected_chain_id,
                actual = chain_id,
                "wallet connected to the wrong network"
            );
            return Err(SessionError::WrongNetwork {
                expected: config.expected_chain_id,
                actual: chain_id,
            });
        }
        let address = wallet.account_address().await?;

        let view = MarketView::new(config.history_capacity);
        let refresh = RefreshLoop::start(reader, view.clone(), config.refresh_interval);
        let (status, _) = watch::channel(SwapStatus::Idle);

        info!(account = %address, chain_id, "swap session connected");

        Ok(Self {
            engine: QuoteEngine::new(config.quote),
            executor: SwapExecutor::new(writer),
            wallet: WalletInfo { address, chain_id },
            config,
            view,
            refresh,
            status,
        })
    }

    pub fn wallet(&self) -> &WalletInfo {
        &self.wallet
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Latest committed `(fee, price)`, if any read succeeded yet.
    pub fn market(&self) -> Option<MarketSnapshot> {
        self.view.latest()
    }

    pub fn history(&self) -> PriceHistory {
        self.view.history()
    }

    /// Whether the refresh loop is still running.
    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_active()
    }

    /// Poll until the first snapshot lands or `timeout` elapses.
    pub async fn wait_for_market(&self, timeout: Duration) -> Option<MarketSnapshot> {
        let poll = async {
            loop {
                if let Some(snapshot) = self.view.latest() {
                    return snapshot;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.ok()
    }

    /// Quote `input` against the most recently committed market data.
    pub fn quote(&self, input: &str) -> Result<SwapQuote, QuoteError> {
        self.engine.quote(input, self.view.latest().as_ref())
    }

    pub fn status(&self) -> SwapStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SwapStatus> {
        self.status.subscribe()
    }

    /// Point the session at another contract instance.
    ///
    /// The running loop is stopped and a new one started; quotes are withheld
    /// until the new reader delivers its first snapshot.
    pub fn replace_reader(&mut self, reader: Arc<dyn ChainReader>) {
        self.refresh.restart(reader, self.config.refresh_interval);
        info!(generation = self.refresh.generation(), "chain reader replaced");
    }

    /// Quote `input`, submit the swap and wait for it to settle.
    ///
    /// A withheld quote blocks the submission; the swap never goes out
    /// without a slippage floor.
    pub async fn swap(&self, input: &str) -> Result<SwapReceipt, SessionError> {
        let trace_id = TraceId::default();
        let span = root_span("swap", &trace_id);
        span.record("account", self.wallet.address.as_str());

        self.run_swap(input).instrument(span).await
    }

    async fn run_swap(&self, input: &str) -> Result<SwapReceipt, SessionError> {
        let attempt = InFlightSwap::begin(&self.status).ok_or(SessionError::SwapInProgress)?;

        let result = self.submit_and_confirm(input).await;

        attempt.settle(match &result {
            Ok(receipt) => SwapStatus::Succeeded {
                tx_hash: receipt.tx_hash.clone(),
            },
            Err(e) => SwapStatus::Failed {
                reason: e.to_string(),
            },
        });
        result.map_err(SessionError::from)
    }

    async fn submit_and_confirm(&self, input: &str) -> Result<SwapReceipt, ExecutionError> {
        let quote = self.quote(input)?;

        info!(
            amount_in = %quote.amount_in,
            estimated_out = %quote.estimated_out,
            min_amount_out = %quote.min_amount_out,
            fee_bps = quote.fee_bps.bps(),
            "submitting swap"
        );

        let pending = self.executor.submit(&quote).await?;
        self.status.send_replace(SwapStatus::AwaitingConfirmation {
            tx_hash: pending.tx_hash().to_string(),
        });

        self.executor.confirm(pending).await
    }

    /// Stop the refresh loop, then drop the session, which clears the
    /// price history and the latest snapshot.
    pub fn shutdown(self) {
        self.refresh.stop();
        info!(account = %self.wallet.address, "swap session closed");
    }
}

/// Marks one swap attempt as in flight on the status channel.
///
/// If the attempt is abandoned before it settles (the `swap` future is
/// dropped), the status becomes `Failed` so later attempts are not blocked.
struct InFlightSwap<'a> {
    status: &'a watch::Sender<SwapStatus>,
    settled: bool,
}

impl<'a> InFlightSwap<'a> {
    /// `None` when another attempt is already in flight.
    fn begin(status: &'a watch::Sender<SwapStatus>) -> Option<Self> {
        let started = status.send_if_modified(|s| {
            if s.is_in_flight() {
                return false;
            }
            *s = SwapStatus::Submitting;
            true
        });
        started.then_some(Self {
            status,
            settled: false,
        })
    }

    fn settle(mut self, outcome: SwapStatus) {
        self.settled = true;
        self.status.send_replace(outcome);
    }
}

impl Drop for InFlightSwap<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("swap attempt cancelled before it settled");
            self.status.send_replace(SwapStatus::Failed {
                reason: CANCELLED.to_string(),
            });
        }
    }
}

impl Drop for SwapSession {
    fn drop(&mut self) {
        self.refresh.stop();
        self.view.clear();
    }
}
