//! Simulates, then sends a two-transaction bundle for the next block.
//!
//! Needs `AUTH_PRIVATE_KEY`, `SENDER_PRIVATE_KEY` and `PROVIDER_URL` (a Sepolia node), e.g. in `.env`.
//! `RELAY_URL` optionally overrides the Sepolia relay.
use ethers::providers::Middleware;
use ethers::types::U256;
use ethers::utils::parse_units;
use flashbot_rs::prelude::*;

mod common;
use common::{init_tracing, Config, MockTx};

const NUM_TARGET_BLOCKS: u64 = 3;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();

    let config = Config::from_env().await?;
    let client = config
        .client()
        .with_builders(vec!["flashbots".to_string()]);

    let (gas_price, priority_fee) = client.get_gas_price().await?;
    tracing::info!(%gas_price, %priority_fee, "node gas suggestion");

    let tip: U256 = parse_units("1", "gwei")?.into();
    let bundle = Bundle::builder()
        .transactions(vec![
            MockTx::default().tip(tip).build().await?,
            MockTx::default().tip(tip).nonce_add(1).build().await?,
        ])
        .replacement_uuid("demo-send-bundle")
        .build();
    tracing::info!(gas = %client.estimate_gas_bundle(&bundle), "declared gas");

    let target_block = config.provider.get_block_number().await?.as_u64() + 1;
    let options = BundleOptions::new()
        .expiration_duration_in_blocks(NUM_TARGET_BLOCKS)
        .privacy_hints([Hint::Hash, Hint::Calldata, Hint::Logs]);

    tracing::info!("Sending bundle targeting next {NUM_TARGET_BLOCKS} blocks...");
    match client.broadcast(&bundle, target_block, &options).await {
        Ok(response) => tracing::info!(bundle_hash = ?response.bundle_hash, "sent"),
        Err(Error::SimulationFailed(reason)) => tracing::warn!(?reason, "not sent"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
