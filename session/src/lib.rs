pub mod config;
pub mod errors;
pub mod manager;
pub mod model;
pub mod wallet;

pub use config::SessionConfig;
pub use errors::{SessionError, WalletError};
pub use manager::SwapSession;
pub use model::{SwapStatus, WalletInfo};
pub use wallet::WalletSession;
