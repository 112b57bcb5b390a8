use async_trait::async_trait;

use crate::errors::WalletError;

/// The connected wallet: signer identity and current network.
///
/// The session refuses to start when `chain_id` differs from the configured
/// network, so nothing downstream ever talks to the wrong chain.
#[async_trait]
pub trait WalletSession: Send + Sync {
    async fn account_address(&self) -> Result<String, WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;
}
