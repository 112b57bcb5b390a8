//! Raw ABI values to validated market types.

use alloy::contract::Error as ContractError;
use alloy::primitives::{I256, U256};
use alloy::transports::RpcError;
use bigdecimal::num_bigint::BigInt;

use executor::TransactionError;
use market::{ChainReadError, FeeBps, OraclePrice};

/// `getVolatilityFee()` answer to basis points.
pub fn fee_from_raw(raw: U256) -> Result<FeeBps, ChainReadError> {
    // Anything beyond u64 is out of range anyway.
    let bps = u64::try_from(raw).unwrap_or(u64::MAX);
    Ok(FeeBps::new(bps)?)
}

/// `getLatestPrice()` answer (8 implied decimals) to a positive price.
pub fn price_from_raw(raw: I256) -> Result<OraclePrice, ChainReadError> {
    let answer = BigInt::from_signed_bytes_be(&raw.to_be_bytes::<32>());
    Ok(OraclePrice::from_oracle_answer(answer)?)
}

pub(crate) fn read_error(err: ContractError) -> ChainReadError {
    match err {
        ContractError::TransportError(RpcError::Transport(kind)) => {
            ChainReadError::Transport(kind.to_string())
        }
        other => ChainReadError::Reverted(other.to_string()),
    }
}

pub(crate) fn submit_error(err: ContractError) -> TransactionError {
    match err {
        ContractError::TransportError(RpcError::Transport(kind)) => {
            TransactionError::Transport(kind.to_string())
        }
        other => TransactionError::Rejected(other.to_string()),
    }
}
