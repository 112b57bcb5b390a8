use std::sync::Arc;

use common::logger::child_span;
use tracing::{Instrument, info, warn};

use market::SwapQuote;

use crate::types::{ChainWriter, ExecutionError, PendingSwap, SwapCall, SwapReceipt, TransactionError};

/// Submit a prepared call. Thin pass-through to the writer.
pub async fn submit_swap(
    writer: &dyn ChainWriter,
    call: &SwapCall,
) -> Result<Box<dyn PendingSwap>, TransactionError> {
    writer.submit_swap(call).await
}

/// Executes swaps against a single writer.
///
/// Fail-closed: a missing or zero quote never reaches the writer.
#[derive(Clone)]
pub struct SwapExecutor {
    writer: Arc<dyn ChainWriter>,
}

impl SwapExecutor {
    pub fn new(writer: Arc<dyn ChainWriter>) -> Self {
        Self { writer }
    }

    /// Broadcast a swap for `quote`.
    pub async fn submit(&self, quote: &SwapQuote) -> Result<Box<dyn PendingSwap>, ExecutionError> {
        let call = SwapCall::from_quote(quote)?;

        let pending = submit_swap(self.writer.as_ref(), &call)
            .instrument(child_span("submit_swap"))
            .await
            .inspect_err(|e| warn!(error = %e, "swap submission failed"))?;

        info!(
            tx_hash = %pending.tx_hash(),
            amount_in_raw = %call.amount_in_raw(),
            min_amount_out_raw = %call.min_amount_out_raw(),
            "swap submitted"
        );
        Ok(pending)
    }

    /// Wait for a submitted swap to settle.
    pub async fn confirm(&self, pending: Box<dyn PendingSwap>) -> Result<SwapReceipt, ExecutionError> {
        let span = child_span("wait_for_confirmation");
        span.record("tx_hash", pending.tx_hash());

        match pending.wait_for_confirmation().instrument(span).await {
            Ok(receipt) => {
                info!(tx_hash = %receipt.tx_hash, block = ?receipt.block_number, "swap confirmed");
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "swap failed");
                Err(e.into())
            }
        }
    }
}
