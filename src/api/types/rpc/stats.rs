use ethers::types::TxHash;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Reputation of the signing key on the relay.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub reputation: f64,
    #[serde(flatten)]
    pub stats: HashMap<String, Value>,
}

/// Status of a submitted bundle.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    pub bundle_hash: TxHash,
    pub block_number: u64,
    pub status: String,
    pub message: Option<String>,
}
