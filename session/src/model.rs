use std::fmt;

use serde::Serialize;

/// Lifecycle of the most recent swap attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SwapStatus {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation {
        tx_hash: String,
    },
    Succeeded {
        tx_hash: String,
    },
    Failed {
        reason: String,
    },
}

impl SwapStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SwapStatus::Submitting | SwapStatus::AwaitingConfirmation { .. }
        )
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapStatus::Idle => f.write_str("idle"),
            SwapStatus::Submitting => f.write_str("sending transaction..."),
            SwapStatus::AwaitingConfirmation { tx_hash } => {
                write!(f, "waiting for confirmation of {tx_hash}...")
            }
            SwapStatus::Succeeded { tx_hash } => write!(f, "swap completed ({tx_hash})"),
            SwapStatus::Failed { reason } => write!(f, "transaction failed: {reason}"),
        }
    }
}

/// Identity of the connected wallet, captured at connect time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletInfo {
    pub address: String,
    pub chain_id: u64,
}
