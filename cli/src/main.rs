mod cli;
mod render;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::time::MissedTickBehavior;

use adapters::HackSwapClient;
use common::logger::init_logger;
use session::{SessionConfig, SwapSession};

use cli::{Cli, Command};
use render::{history_line, market_line, quote_line};

/// How long `info`, `quote` and `swap` wait for the first market read.
const FIRST_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_logger("hackswap", is_production || cli.json_logs);

    let config = cli.session_config()?;
    let client = HackSwapClient::connect(&cli.rpc_url, &cli.contract, &cli.private_key).await?;

    let session = SwapSession::connect(
        config.clone(),
        &client.wallet,
        client.contract.clone(),
        client.contract.clone(),
    )
    .await?;

    let result = match cli.command {
        Command::Info => info(&session, &client).await,
        Command::Watch { amount } => watch(&session, &config, amount.as_deref()).await,
        Command::Quote { amount, json } => quote(&session, &config, &amount, json).await,
        Command::Swap { amount } => swap(&session, &amount).await,
    };

    session.shutdown();
    result
}

async fn first_read(session: &SwapSession) -> anyhow::Result<market::MarketSnapshot> {
    session
        .wait_for_market(FIRST_READ_TIMEOUT)
        .await
        .context("no fee/price read succeeded before the timeout")
}

async fn info(session: &SwapSession, client: &HackSwapClient) -> anyhow::Result<()> {
    let tokens = client.contract.tokens().await?;
    let snapshot = first_read(session).await?;

    let wallet = session.wallet();
    println!("account  {}", wallet.address);
    println!("network  {}", wallet.chain_id);
    println!("contract {}", client.contract.address());
    println!("tokenA   {}", tokens.token_a);
    println!("tokenB   {}", tokens.token_b);
    println!("{}", market_line(&snapshot));
    Ok(())
}

async fn watch(
    session: &SwapSession,
    config: &SessionConfig,
    amount: Option<&str>,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_seen = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let Some(snapshot) = session.market() else {
            continue;
        };
        if last_seen == Some(snapshot.observed_at) {
            continue;
        }
        last_seen = Some(snapshot.observed_at);

        println!("{}", market_line(&snapshot));
        println!("{}", history_line(&session.history()));

        if let Some(amount) = amount {
            match session.quote(amount) {
                Ok(q) => println!("{}", quote_line(&q, config.quote.token_out_decimals)),
                Err(e) => println!("quote unavailable: {e}"),
            }
        }
    }
}

async fn quote(
    session: &SwapSession,
    config: &SessionConfig,
    amount: &str,
    json: bool,
) -> anyhow::Result<()> {
    first_read(session).await?;
    let q = session.quote(amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&q)?);
    } else {
        println!("{}", quote_line(&q, config.quote.token_out_decimals));
    }
    Ok(())
}

async fn swap(session: &SwapSession, amount: &str) -> anyhow::Result<()> {
    first_read(session).await?;

    let mut status = session.subscribe_status();
    let swap = session.swap(amount);
    tokio::pin!(swap);

    let receipt = loop {
        tokio::select! {
            result = &mut swap => break result?,
            Ok(()) = status.changed() => {
                println!("status: {}", *status.borrow_and_update());
            }
        }
    };
    println!("status: {}", session.status());

    if let Some(block) = receipt.block_number {
        println!("included in block {block}");
    }
    Ok(())
}
