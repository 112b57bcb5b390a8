use bigdecimal::BigDecimal;
use thiserror::Error;

/// A value read from the chain that violates the pool's documented ranges.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    #[error("fee {0} bps outside [0, 10000]")]
    FeeOutOfRange(u64),

    #[error("oracle price must be positive, got {0}")]
    NonPositivePrice(BigDecimal),
}

/// Failure of a single `(fee, price)` read.
///
/// Never fatal: the refresh loop logs it and retries on the next tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainReadError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("contract call reverted: {0}")]
    Reverted(String),

    #[error("invalid market data: {0}")]
    InvalidData(#[from] MarketDataError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("negative amount cannot be expressed in base units")]
    Negative,

    #[error("amount has more than {decimals} fractional digits")]
    ExcessPrecision { decimals: u8 },

    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// Reasons a quote is withheld.
///
/// All of them are recovered locally: the caller shows no estimate and keeps
/// the swap disabled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("no amount entered")]
    Empty,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("negative amount: {0}")]
    NegativeAmount(String),

    #[error("fee or price not loaded yet")]
    DataUnavailable,

    #[error("slippage tolerance {0} bps outside (0, 10000]")]
    InvalidTolerance(u32),

    #[error(transparent)]
    Units(#[from] UnitsError),
}
