use ethers::types::{Address, Bytes, H256, U256, U64};
use serde::Deserialize;

/// Simulation details returned by `mev_simBundle`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SimulateBundleResponse {
    pub success: bool,
    pub error: Option<String>,
    pub state_block: U64,
    pub mev_gas_price: U256,
    pub profit: U256,
    pub refundable_value: U256,
    pub gas_used: U256,
    pub logs: Option<Vec<BundleLogs>>,
}

/// Logs emitted by one body entry during simulation.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BundleLogs {
    pub tx_logs: Option<Vec<TxLog>>,
    /// Logs of a nested bundle.
    pub bundle_logs: Option<Vec<BundleLogs>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TxLog {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
}
