use std::time::Duration;

use clap::{Parser, Subcommand};

use market::units::DEFAULT_TOKEN_DECIMALS;
use market::{QuoteConfig, SlippageTolerance};
use session::SessionConfig;
use session::config::DEFAULT_CHAIN_ID;

#[derive(Debug, Parser)]
#[clap(name = "hackswap", version)]
pub struct Cli {
    /// JSON-RPC endpoint of the chain the contract is deployed on
    #[clap(long, env = "HACKSWAP_RPC_URL")]
    pub rpc_url: String,

    /// HackSwap contract address
    #[clap(long, env = "HACKSWAP_CONTRACT")]
    pub contract: String,

    /// Hex private key of the swapping account
    #[clap(long, env = "HACKSWAP_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Chain id the wallet must report before anything is read or sent
    #[clap(long, env = "HACKSWAP_CHAIN_ID", default_value_t = DEFAULT_CHAIN_ID)]
    pub chain_id: u64,

    /// Delay between two fee/price reads, in milliseconds
    #[clap(long, env = "HACKSWAP_REFRESH_MS", default_value_t = 10_000)]
    pub refresh_ms: u64,

    /// Slippage tolerance in basis points (100 = 1%)
    #[clap(long, env = "HACKSWAP_SLIPPAGE_BPS", default_value_t = SlippageTolerance::DEFAULT_BPS)]
    pub slippage_bps: u32,

    #[clap(long, default_value_t = DEFAULT_TOKEN_DECIMALS)]
    pub token_in_decimals: u8,

    #[clap(long, default_value_t = DEFAULT_TOKEN_DECIMALS)]
    pub token_out_decimals: u8,

    /// Emit logs as JSON (also enabled by APP_ENV=production)
    #[clap(long, global = true)]
    pub json_logs: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Account, network, token pair and current fee/price
    Info,

    /// Print fee, price and history on every refresh until interrupted
    Watch {
        /// Re-quote this input amount on every refresh
        #[clap(long)]
        amount: Option<String>,
    },

    /// Quote an input amount once market data is available
    Quote {
        #[clap(long)]
        amount: String,

        #[clap(long)]
        json: bool,
    },

    /// Quote, submit and wait for the swap to settle
    Swap {
        #[clap(long)]
        amount: String,
    },
}

impl Cli {
    pub fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let slippage = SlippageTolerance::from_bps(self.slippage_bps)?;

        Ok(SessionConfig {
            expected_chain_id: self.chain_id,
            refresh_interval: Duration::from_millis(self.refresh_ms),
            quote: QuoteConfig {
                slippage,
                token_in_decimals: self.token_in_decimals,
                token_out_decimals: self.token_out_decimals,
                ..QuoteConfig::default()
            },
            ..SessionConfig::default()
        })
    }
}
