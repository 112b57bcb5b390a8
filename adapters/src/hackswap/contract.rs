use async_trait::async_trait;
use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, PendingTransactionBuilder};
use tracing::{debug, info, warn};

use executor::{ChainWriter, PendingSwap, SwapCall, SwapReceipt, TransactionError};
use market::{ChainReadError, ChainReader, OracleReading};

use super::bindings::HackSwap;
use super::conversions::{fee_from_raw, price_from_raw, read_error, submit_error};

pub type HackSwapInstance = HackSwap::HackSwapInstance<DynProvider>;

/// The two tokens the contract swaps between (`tokenA` in, `tokenB` out).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPair {
    pub token_a: Address,
    pub token_b: Address,
}

/// A deployed HackSwap contract behind a signing provider.
pub struct HackSwapContract {
    instance: HackSwapInstance,
}

impl HackSwapContract {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            instance: HackSwap::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    pub async fn tokens(&self) -> Result<TokenPair, ChainReadError> {
        let token_a = self.instance.tokenA().call().await.map_err(read_error)?;
        let token_b = self.instance.tokenB().call().await.map_err(read_error)?;
        Ok(TokenPair { token_a, token_b })
    }
}

#[async_trait]
impl ChainReader for HackSwapContract {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError> {
        let fee_call = self.instance.getVolatilityFee();
        let price_call = self.instance.getLatestPrice();

        let raw_fee = fee_call.call().await.map_err(read_error)?;
        let raw_price = price_call.call().await.map_err(read_error)?;
        debug!(%raw_fee, %raw_price, "read fee and price");

        Ok(OracleReading {
            fee_bps: fee_from_raw(raw_fee)?,
            price: price_from_raw(raw_price)?,
        })
    }
}

#[async_trait]
impl ChainWriter for HackSwapContract {
    async fn submit_swap(&self, call: &SwapCall) -> Result<Box<dyn PendingSwap>, TransactionError> {
        let pending = self
            .instance
            .swap(call.amount_in_raw(), call.min_amount_out_raw())
            .send()
            .await
            .map_err(submit_error)?;

        let tx_hash = pending.tx_hash().to_string();
        info!(%tx_hash, contract = %self.address(), "swap transaction broadcast");

        Ok(Box::new(BroadcastSwap { tx_hash, pending }))
    }
}

struct BroadcastSwap {
    tx_hash: String,
    pending: PendingTransactionBuilder<Ethereum>,
}

#[async_trait]
impl PendingSwap for BroadcastSwap {
    fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    async fn wait_for_confirmation(self: Box<Self>) -> Result<SwapReceipt, TransactionError> {
        let Self { tx_hash, pending } = *self;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| TransactionError::Unconfirmed {
                tx_hash: tx_hash.clone(),
                reason: e.to_string(),
            })?;

        if !receipt.status() {
            warn!(%tx_hash, "swap transaction reverted");
            return Err(TransactionError::Reverted { tx_hash });
        }

        Ok(SwapReceipt {
            tx_hash,
            block_number: receipt.block_number(),
        })
    }
}
