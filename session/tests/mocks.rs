use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use parking_lot::Mutex;
use tokio::sync::Notify;

use executor::{ChainWriter, PendingSwap, SwapCall, SwapReceipt, TransactionError};
use market::{ChainReadError, ChainReader, FeeBps, OraclePrice, OracleReading};
use session::{WalletError, WalletSession};

pub struct MockWallet {
    pub chain_id: u64,
}

#[async_trait]
impl WalletSession for MockWallet {
    async fn account_address(&self) -> Result<String, WalletError> {
        Ok("0x00000000000000000000000000000000000000aa".into())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }
}

/// Always returns the same fee and price.
pub struct FixedReader {
    pub fee_bps: u64,
    pub price: &'static str,
    pub calls: AtomicUsize,
}

impl FixedReader {
    pub fn new(fee_bps: u64, price: &'static str) -> Arc<Self> {
        Arc::new(Self {
            fee_bps,
            price,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChainReader for FixedReader {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(OracleReading {
            fee_bps: FeeBps::new(self.fee_bps)?,
            price: OraclePrice::new(BigDecimal::from_str(self.price).unwrap())?,
        })
    }
}

pub struct FailingReader;

#[async_trait]
impl ChainReader for FailingReader {
    async fn read_fee_and_price(&self) -> Result<OracleReading, ChainReadError> {
        Err(ChainReadError::Transport("rpc unreachable".into()))
    }
}

/// Records calls; confirmations block until `release` is notified.
#[derive(Default)]
pub struct GatedWriter {
    pub calls: Mutex<Vec<SwapCall>>,
    pub release: Arc<Notify>,
    pub revert: bool,
}

struct GatedPending {
    tx_hash: String,
    release: Arc<Notify>,
    revert: bool,
}

#[async_trait]
impl PendingSwap for GatedPending {
    fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    async fn wait_for_confirmation(self: Box<Self>) -> Result<SwapReceipt, TransactionError> {
        self.release.notified().await;
        if self.revert {
            return Err(TransactionError::Reverted {
                tx_hash: self.tx_hash,
            });
        }
        Ok(SwapReceipt {
            tx_hash: self.tx_hash,
            block_number: Some(1),
        })
    }
}

#[async_trait]
impl ChainWriter for GatedWriter {
    async fn submit_swap(&self, call: &SwapCall) -> Result<Box<dyn PendingSwap>, TransactionError> {
        self.calls.lock().push(call.clone());
        Ok(Box::new(GatedPending {
            tx_hash: "0xabc".into(),
            release: self.release.clone(),
            revert: self.revert,
        }))
    }
}
