//! Common types and small abstraction traits used by the executor.

use alloy_primitives::U256;
use async_trait::async_trait;
use thiserror::Error;

use market::{QuoteError, SwapQuote};

/// Raw arguments of `swap(uint256 amountIn, uint256 minAmountOut)`.
///
/// Only constructible from a quote, so every submission carries a
/// slippage floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapCall {
    amount_in_raw: U256,
    min_amount_out_raw: U256,
}

impl SwapCall {
    pub fn from_quote(quote: &SwapQuote) -> Result<Self, ExecutionError> {
        if quote.is_zero() {
            return Err(ExecutionError::ZeroAmount);
        }
        Ok(Self {
            amount_in_raw: quote.amount_in_raw,
            min_amount_out_raw: quote.min_amount_out_raw,
        })
    }

    pub fn amount_in_raw(&self) -> U256 {
        self.amount_in_raw
    }

    pub fn min_amount_out_raw(&self) -> U256 {
        self.min_amount_out_raw
    }
}

/// Settled swap transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
}

/// Failure of one swap attempt. Terminal for that attempt only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Wallet or node refused the transaction before broadcast.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Mined but reverted (e.g. output below `minAmountOut`).
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("gave up waiting for confirmation of {tx_hash}: {reason}")]
    Unconfirmed { tx_hash: String, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("no quote available: {0}")]
    NoQuote(#[from] QuoteError),

    #[error("refusing to swap a zero amount")]
    ZeroAmount,

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// A broadcast transaction awaiting settlement.
#[async_trait]
pub trait PendingSwap: Send {
    fn tx_hash(&self) -> &str;

    async fn wait_for_confirmation(self: Box<Self>) -> Result<SwapReceipt, TransactionError>;
}

/// Write side of the swap contract.
///
/// This trait intentionally hides:
/// - signing
/// - RPC details
/// - error formats
#[async_trait]
pub trait ChainWriter: Send + Sync {
    async fn submit_swap(&self, call: &SwapCall) -> Result<Box<dyn PendingSwap>, TransactionError>;
}
