#![allow(dead_code)]

//! Simulates a single-transaction bundle against the latest block and prints the outcome.
use flashbot_rs::prelude::*;

mod common;
use common::{init_tracing, Config, MockTx};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();

    let config = Config::from_env().await?;
    let client = config.client();

    let bundle = Bundle::builder()
        .transactions(vec![MockTx::default().build().await?])
        .build();

    let simulation = client.simulate(&bundle, 0, &BundleOptions::new()).await?;
    dbg!(&simulation);

    Ok(())
}
