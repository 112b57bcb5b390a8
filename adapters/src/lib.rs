//! On-chain adapters for the swap core.
//!
//! `hackswap` binds the HackSwap contract over an alloy provider and
//! implements the market reader, the swap writer and the wallet session.

pub mod errors;
pub mod hackswap;

pub use errors::AdapterError;
pub use hackswap::{HackSwapClient, HackSwapContract, LocalWallet, TokenPair};
