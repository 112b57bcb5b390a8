use async_trait::async_trait;

use crate::errors::ChainReadError;
use crate::types::OracleReading;

/// Read side of the swap contract.
///
/// Implementations normalize transport and contract errors into
/// `ChainReadError`; out-of-range values must be reported as
/// `ChainReadError::InvalidData`, never clamped.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError>;
}
