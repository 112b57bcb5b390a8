//! Swap submission.
//!
//! Turns a `SwapQuote` into the raw `(amountIn, minAmountOut)` pair and hands
//! it to a `ChainWriter`. Signing, broadcasting and confirmation belong to
//! the writer; this layer only guarantees that nothing is submitted without
//! a slippage floor derived from a real quote.

pub mod swap_executor;
pub mod types;

pub use swap_executor::{SwapExecutor, submit_swap};
pub use types::{ChainWriter, ExecutionError, PendingSwap, SwapCall, SwapReceipt, TransactionError};
