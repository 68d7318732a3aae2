//! Client for Flashbots-style relays: simulate and send MEV bundles over signed JSON-RPC.

mod api;
mod bundle;
mod client;
mod error;
pub mod prelude;
mod provider;

pub use api::networks::{Network, RelayNetwork};
pub use api::rpc_client::{RelayMethod, RelayRpcClient, Transport};
pub use api::signer::{sign_request, signed_message, SIGNATURE_HEADER};
pub use api::types::*;
pub use bundle::Bundle;
pub use client::FlashbotClient;
pub use error::{Error, OptionError, Result};
pub use provider::GasOracle;
