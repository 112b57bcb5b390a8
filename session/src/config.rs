use std::time::Duration;

use market::QuoteConfig;
use market::price_history::DEFAULT_HISTORY_CAPACITY;
use market::refresh::DEFAULT_REFRESH_INTERVAL;

/// Ethereum mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 1;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Network the contract lives on.
    ///
    /// The session refuses to connect when the wallet reports another chain.
    pub expected_chain_id: u64,

    // =========================
    // Refresh configuration
    // =========================
    /// Delay between two `(fee, price)` reads.
    ///
    /// A read that outlasts the interval delays the next one instead of
    /// running concurrently with it.
    pub refresh_interval: Duration,

    /// Number of price samples kept for the history chart.
    pub history_capacity: usize,

    // =========================
    // Quote configuration
    // =========================
    /// Slippage tolerance and token precision used for every quote.
    pub quote: QuoteConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expected_chain_id: DEFAULT_CHAIN_ID,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            quote: QuoteConfig::default(),
        }
    }
}
