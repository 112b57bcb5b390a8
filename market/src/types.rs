use std::fmt;

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::{BigInt, Sign};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{MarketDataError, QuoteError};

/// 10000 bps = 100%.
pub const MAX_BPS: u32 = 10_000;

/// Fractional digits of the raw oracle answer (Chainlink-style int256).
pub const ORACLE_DECIMALS: i64 = 8;

/// `(10000 - bps) / 10000` as an exact decimal.
fn bps_complement(bps: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(MAX_BPS - bps), 4)
}

/// Swap fee in basis points, always within `[0, 10000]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FeeBps(u32);

impl FeeBps {
    pub const ZERO: FeeBps = FeeBps(0);

    pub fn new(bps: u64) -> Result<Self, MarketDataError> {
        if bps > MAX_BPS as u64 {
            return Err(MarketDataError::FeeOutOfRange(bps));
        }
        Ok(Self(bps as u32))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    /// Share of the input left after the fee is taken.
    pub fn remaining_fraction(&self) -> BigDecimal {
        bps_complement(self.0)
    }
}

/// `125` -> `1.25%`.
fn write_bps_percent(f: &mut fmt::Formatter<'_>, bps: u32) -> fmt::Result {
    write!(f, "{}.{:02}%", bps / 100, bps % 100)
}

/// Renders as a percentage, e.g. `1.25%` for 125 bps.
impl fmt::Display for FeeBps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bps_percent(f, self.0)
    }
}

/// Output-token units per one input-token unit. Strictly positive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Serialize)]
pub struct OraclePrice(BigDecimal);

impl OraclePrice {
    pub fn new(value: BigDecimal) -> Result<Self, MarketDataError> {
        if value.sign() != Sign::Plus {
            return Err(MarketDataError::NonPositivePrice(value));
        }
        Ok(Self(value))
    }

    /// Build a price from the raw oracle answer, `raw / 10^8`.
    pub fn from_oracle_answer(raw: BigInt) -> Result<Self, MarketDataError> {
        Self::new(BigDecimal::new(raw, ORACLE_DECIMALS))
    }

    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl fmt::Display for OraclePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&trimmed_plain(&self.0))
    }
}

/// Plain (non-scientific) rendering without trailing fractional zeros.
pub fn trimmed_plain(value: &BigDecimal) -> String {
    let plain = value.to_plain_string();
    if plain.contains('.') {
        plain.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        plain
    }
}

/// Maximum accepted shortfall of the actual output, in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SlippageTolerance(u32);

impl SlippageTolerance {
    pub const DEFAULT_BPS: u32 = 100;

    pub fn from_bps(bps: u32) -> Result<Self, QuoteError> {
        if bps == 0 || bps > MAX_BPS {
            return Err(QuoteError::InvalidTolerance(bps));
        }
        Ok(Self(bps))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    /// `1 - tolerance`.
    pub fn retained_fraction(&self) -> BigDecimal {
        bps_complement(self.0)
    }
}

impl fmt::Display for SlippageTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bps_percent(f, self.0)
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self(Self::DEFAULT_BPS)
    }
}

/// One successful `(fee, price)` read, as returned by a chain reader.
#[derive(Clone, Debug, PartialEq)]
pub struct OracleReading {
    pub fee_bps: FeeBps,
    pub price: OraclePrice,
}

/// The latest committed market state quotes are computed from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub fee_bps: FeeBps,
    pub price: OraclePrice,
    pub observed_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn observed(reading: OracleReading, observed_at: DateTime<Utc>) -> Self {
        Self {
            fee_bps: reading.fee_bps,
            price: reading.price,
            observed_at,
        }
    }
}

/// A single point of the price history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceSample {
    pub at: DateTime<Utc>,
    pub price: OraclePrice,
}

impl PriceSample {
    /// Wall-clock label used by the history chart, e.g. `14:03:27`.
    pub fn time_label(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}
