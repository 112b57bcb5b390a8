use thiserror::Error;

use market::ChainReadError;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid contract address `{0}`")]
    InvalidAddress(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error(transparent)]
    Read(#[from] ChainReadError),
}
