use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use tracing::info;

use crate::errors::AdapterError;

use super::contract::HackSwapContract;
use super::wallet::LocalWallet;

/// Everything needed to drive one HackSwap deployment from a local key.
pub struct HackSwapClient {
    pub contract: Arc<HackSwapContract>,
    pub wallet: LocalWallet,
}

impl HackSwapClient {
    pub async fn connect(
        rpc_url: &str,
        contract: &str,
        private_key: &str,
    ) -> Result<Self, AdapterError> {
        let address: Address = contract
            .trim()
            .parse()
            .map_err(|_| AdapterError::InvalidAddress(contract.to_string()))?;

        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e: alloy::signers::local::LocalSignerError| {
                AdapterError::InvalidKey(e.to_string())
            })?;
        let account = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect(rpc_url)
            .await
            .map_err(|e| AdapterError::Connect {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            })?
            .erased();

        info!(%account, contract = %address, "hackswap client connected");

        Ok(Self {
            contract: Arc::new(HackSwapContract::new(address, provider.clone())),
            wallet: LocalWallet::new(account, provider),
        })
    }
}
