mod bindings;
mod client;
mod contract;
pub mod conversions;
mod wallet;

pub use bindings::HackSwap;
pub use client::HackSwapClient;
pub use contract::{HackSwapContract, TokenPair};
pub use wallet::LocalWallet;
