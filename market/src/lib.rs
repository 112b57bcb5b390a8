//! Market data and quoting for a single HackSwap pool.
//!
//! Data flow:
//! ChainReader -> RefreshLoop -> MarketView -> QuoteEngine

pub mod errors;
pub mod price_history;
pub mod quote;
pub mod reader;
pub mod refresh;
pub mod types;
pub mod units;
pub mod view;

pub use errors::{ChainReadError, MarketDataError, QuoteError, UnitsError};
pub use quote::{QuoteConfig, QuoteEngine, SwapQuote, compute_quote};
pub use reader::ChainReader;
pub use refresh::{RefreshHandle, RefreshLoop};
pub use types::{FeeBps, MarketSnapshot, OraclePrice, OracleReading, PriceSample, SlippageTolerance};
pub use view::MarketView;
