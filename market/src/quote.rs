use std::str::FromStr;

use alloy_primitives::U256;
use bigdecimal::num_bigint::Sign;
use bigdecimal::{BigDecimal, RoundingMode};
use serde::Serialize;

use crate::errors::QuoteError;
use crate::types::{FeeBps, MarketSnapshot, OraclePrice, SlippageTolerance};
use crate::units::{DEFAULT_TOKEN_DECIMALS, to_base_units, to_base_units_floor};

/// Fractional digits kept on the estimated output.
pub const DEFAULT_DISPLAY_DECIMALS: u8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuoteConfig {
    pub slippage: SlippageTolerance,
    pub display_decimals: u8,
    pub token_in_decimals: u8,
    pub token_out_decimals: u8,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            slippage: SlippageTolerance::default(),
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
            token_in_decimals: DEFAULT_TOKEN_DECIMALS,
            token_out_decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }
}

/// Estimated output of a swap and the floor submitted on-chain.
///
/// Invariant: `0 <= min_amount_out <= estimated_out`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SwapQuote {
    pub amount_in: BigDecimal,
    pub amount_in_raw: U256,
    pub fee_bps: FeeBps,
    pub price: OraclePrice,
    pub amount_after_fee: BigDecimal,
    pub estimated_out: BigDecimal,
    pub min_amount_out: BigDecimal,
    pub min_amount_out_raw: U256,
    pub slippage: SlippageTolerance,
}

impl SwapQuote {
    pub fn is_zero(&self) -> bool {
        self.amount_in_raw.is_zero()
    }
}

/// Stateless quote computation over a fixed configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuoteEngine {
    config: QuoteConfig,
}

impl QuoteEngine {
    pub fn new(config: QuoteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Quote against the latest committed snapshot, if any.
    pub fn quote(
        &self,
        input: &str,
        market: Option<&MarketSnapshot>,
    ) -> Result<SwapQuote, QuoteError> {
        self.compute(input, market.map(|m| m.fee_bps), market.map(|m| &m.price))
    }

    pub fn compute(
        &self,
        input: &str,
        fee_bps: Option<FeeBps>,
        price: Option<&OraclePrice>,
    ) -> Result<SwapQuote, QuoteError> {
        let amount_in = parse_amount(input)?;

        let (Some(fee_bps), Some(price)) = (fee_bps, price) else {
            return Err(QuoteError::DataUnavailable);
        };

        let amount_in_raw = to_base_units(&amount_in, self.config.token_in_decimals)
            .map_err(|e| QuoteError::InvalidAmount(format!("{}: {e}", input.trim())))?;

        let amount_after_fee = &amount_in * fee_bps.remaining_fraction();

        // Truncated so the estimate never overstates what the pool returns.
        let estimated_out = (&amount_after_fee * price.as_decimal())
            .with_scale_round(self.config.display_decimals as i64, RoundingMode::Down);

        let min_amount_out = (&estimated_out * self.config.slippage.retained_fraction())
            .with_scale_round(self.config.token_out_decimals as i64, RoundingMode::Down);
        let min_amount_out_raw =
            to_base_units_floor(&min_amount_out, self.config.token_out_decimals)?;

        Ok(SwapQuote {
            amount_in,
            amount_in_raw,
            fee_bps,
            price: price.clone(),
            amount_after_fee,
            estimated_out,
            min_amount_out,
            min_amount_out_raw,
            slippage: self.config.slippage,
        })
    }
}

/// One-shot quote with default decimals.
pub fn compute_quote(
    input: &str,
    fee_bps: Option<FeeBps>,
    price: Option<&OraclePrice>,
    slippage: SlippageTolerance,
) -> Result<SwapQuote, QuoteError> {
    QuoteEngine::new(QuoteConfig {
        slippage,
        ..QuoteConfig::default()
    })
    .compute(input, fee_bps, price)
}

fn parse_amount(input: &str) -> Result<BigDecimal, QuoteError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(QuoteError::Empty);
    }

    let amount = BigDecimal::from_str(trimmed)
        .map_err(|_| QuoteError::InvalidAmount(trimmed.to_string()))?;

    if amount.sign() == Sign::Minus {
        return Err(QuoteError::NegativeAmount(trimmed.to_string()));
    }
    Ok(amount)
}
