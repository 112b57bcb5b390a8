//! Conversions between human decimal amounts and integer token base units
//! (`amount = value * 10^decimals`).

use alloy_primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign, ToBigInt};
use bigdecimal::{BigDecimal, RoundingMode};

use crate::errors::UnitsError;

/// Standard ERC20 precision.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Decimal digits of `U256::MAX`.
const MAX_U256_DIGITS: i64 = 78;

/// Digits left of the decimal point; zero or negative below one.
fn integer_digits(amount: &BigDecimal) -> i64 {
    (amount.digits() as i64).saturating_sub(amount.fractional_digit_count())
}

/// Rejects magnitudes that cannot fit in 256 bits before anything is scaled.
/// `10^exponent` is never materialized for absurd exponents.
fn check_magnitude(amount: &BigDecimal) -> Result<(), UnitsError> {
    match amount.sign() {
        Sign::Minus => Err(UnitsError::Negative),
        Sign::Plus if integer_digits(amount) > MAX_U256_DIGITS => Err(UnitsError::Overflow),
        _ => Ok(()),
    }
}

fn scale_up(amount: &BigDecimal, decimals: u8) -> BigDecimal {
    amount * BigDecimal::new(BigInt::from(1), -(decimals as i64))
}

fn big_int_to_u256(value: &BigInt) -> Result<U256, UnitsError> {
    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus {
        return Err(UnitsError::Negative);
    }
    U256::try_from_be_slice(&bytes).ok_or(UnitsError::Overflow)
}

/// Exact conversion. Fails if `amount` carries more fractional digits than
/// the token has.
pub fn to_base_units(amount: &BigDecimal, decimals: u8) -> Result<U256, UnitsError> {
    check_magnitude(amount)?;
    if amount.sign() == Sign::NoSign {
        return Ok(U256::ZERO);
    }

    // Trailing zeros ("1.50000") are fine; significant sub-unit digits are not.
    let normalized;
    let amount = if amount.fractional_digit_count() > decimals as i64 {
        normalized = amount.normalized();
        if normalized.fractional_digit_count() > decimals as i64 {
            return Err(UnitsError::ExcessPrecision { decimals });
        }
        &normalized
    } else {
        amount
    };

    let scaled = scale_up(amount, decimals);
    let int = scaled.to_bigint().ok_or(UnitsError::Overflow)?;
    big_int_to_u256(&int)
}

/// Conversion truncating any digits below one base unit.
pub fn to_base_units_floor(amount: &BigDecimal, decimals: u8) -> Result<U256, UnitsError> {
    check_magnitude(amount)?;
    if amount.sign() == Sign::NoSign || integer_digits(amount) < -(decimals as i64) {
        return Ok(U256::ZERO);
    }
    let scaled = scale_up(amount, decimals).with_scale_round(0, RoundingMode::Down);
    let int = scaled.to_bigint().ok_or(UnitsError::Overflow)?;
    big_int_to_u256(&int)
}

/// Renders base units as a fixed-point decimal string, e.g.
/// `format_units(1_337_000, 6) == "1.337000"`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        digits
    } else if digits.len() <= decimals {
        format!("0.{:0>pad$}", digits, pad = decimals)
    } else {
        let split = digits.len() - decimals;
        format!("{}.{}", &digits[..split], &digits[split..])
    }
}
