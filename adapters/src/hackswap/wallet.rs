use async_trait::async_trait;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};

use session::{WalletError, WalletSession};

/// Local private-key signer plus the provider it signs through.
#[derive(Clone)]
pub struct LocalWallet {
    address: Address,
    provider: DynProvider,
}

impl LocalWallet {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl WalletSession for LocalWallet {
    async fn account_address(&self) -> Result<String, WalletError> {
        Ok(self.address.to_string())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| WalletError::Request(e.to_string()))
    }
}
