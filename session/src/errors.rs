use thiserror::Error;

use executor::ExecutionError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet unavailable: {0}")]
    Unavailable(String),

    #[error("wallet request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("a swap is already in progress")]
    SwapInProgress,

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
