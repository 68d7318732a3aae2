use crate::api::networks::{Network, RelayNetwork};
use crate::api::rpc_client::{RelayMethod, RelayRpcClient, Transport};
use crate::api::types::{
    BundleOptions, BundleParams, BundleStats, SendBundleResponse, SimulateBundleResponse,
    UserStats,
};
use crate::error::{Error, Result};
use crate::provider::GasOracle;
use crate::Bundle;
use ethers::core::rand::thread_rng;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TxHash, U256};
use tracing::*;

/// Client for a Flashbots-style relay.
///
/// Holds the key that authenticates requests, the relay endpoint and, optionally,
/// a chain node (`N`) for gas price suggestions. Requests go through `T`, a
/// [`reqwest::Client`] unless replaced with [`FlashbotClient::with_transport`].
///
/// All methods take `&self`: the client can be shared between tasks.
#[derive(Debug, Clone)]
pub struct FlashbotClient<N = Provider<Http>, T = reqwest::Client> {
    rpc: RelayRpcClient<T>,
    chain_id: u64,
    builders: Vec<String>,
    node: Option<N>,
}

impl FlashbotClient {
    /// Creates a client for the relay of `network`.
    ///
    /// Requests are signed with a freshly generated key. Relays build reputation per key,
    /// so set a stable one with [`FlashbotClient::with_auth_wallet`] for anything long-lived.
    pub fn new(network: Network) -> Self {
        let network = RelayNetwork::from(network);
        let auth_wallet = LocalWallet::new(&mut thread_rng());

        Self {
            rpc: RelayRpcClient::new(network.relay_url, reqwest::Client::new(), auth_wallet),
            chain_id: network.chain_id(),
            builders: Vec::new(),
            node: None,
        }
    }
}

impl Default for FlashbotClient {
    fn default() -> Self {
        Self::new(Network::default())
    }
}

impl<N, T> FlashbotClient<N, T>
where
    N: GasOracle,
    T: Transport,
{
    /// Signs requests with `auth_wallet` instead of the generated key.
    #[must_use]
    pub fn with_auth_wallet(mut self, auth_wallet: LocalWallet) -> Self {
        self.rpc.set_auth_wallet(auth_wallet);
        self
    }

    #[must_use]
    pub fn with_relay_url(mut self, relay_url: impl Into<String>) -> Self {
        self.rpc.set_url(relay_url);
        self
    }

    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Builders that broadcast bundles are routed to when the bundle names none itself.
    #[must_use]
    pub fn with_builders(mut self, builders: Vec<String>) -> Self {
        self.builders = builders;
        self
    }

    /// Sends requests through `transport`, e.g. a [`reqwest::Client`] with custom timeouts.
    pub fn with_transport<U: Transport>(self, transport: U) -> FlashbotClient<N, U> {
        FlashbotClient {
            rpc: self.rpc.with_transport(transport),
            chain_id: self.chain_id,
            builders: self.builders,
            node: self.node,
        }
    }

    /// Uses `node` to answer [`FlashbotClient::get_gas_price`].
    pub fn with_chain_node<M: GasOracle>(self, node: M) -> FlashbotClient<M, T> {
        FlashbotClient {
            rpc: self.rpc,
            chain_id: self.chain_id,
            builders: self.builders,
            node: Some(node),
        }
    }

    /// Address the relay sees as the sender of requests.
    pub fn auth_address(&self) -> Address {
        self.rpc.auth_wallet().address()
    }

    pub fn relay_url(&self) -> &str {
        self.rpc.url()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn builders(&self) -> &[String] {
        &self.builders
    }

    /// Simulates a bundle on the relay (`mev_simBundle`). Nothing lands on-chain.
    ///
    /// # Arguments
    ///
    /// * `bundle` - Transactions to simulate
    /// * `target_block` - Block to simulate for; `0` means the latest block
    /// * `options` - Adjustments applied to the request parameters, in order
    ///
    /// # Returns
    ///
    /// Simulation result.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyBundle`] before any request is made if the bundle has no transactions.
    /// * Any error of [`RelayRpcClient::post`].
    #[instrument(
        skip_all,
        fields(target_block = target_block, txs = bundle.len(), chain_id = self.chain_id),
        err
    )]
    pub async fn simulate(
        &self,
        bundle: &Bundle,
        target_block: u64,
        options: &BundleOptions,
    ) -> Result<SimulateBundleResponse> {
        let params = BundleParams::simulation(bundle, target_block, options)?;

        let simulation: SimulateBundleResponse =
            self.rpc.post(RelayMethod::SimBundle, &params).await?;

        debug!(
            success = simulation.success,
            gas_used = %simulation.gas_used,
            profit = %simulation.profit,
            "bundle simulated"
        );

        Ok(simulation)
    }

    /// Sends a bundle to the relay (`mev_sendBundle`).
    ///
    /// The bundle is always simulated first and only sent if the simulation succeeds:
    /// submitting bundles that revert hurts the reputation of the signing key.
    /// This is stricter than clients that only stop on a relay error: a simulation
    /// answering `success: false` also aborts, with [`Error::SimulationFailed`].
    ///
    /// Unless `options` say otherwise, the bundle stays valid for 30 blocks past
    /// `target_block` and is routed to the bundle's builders, or to the client's.
    ///
    /// # Returns
    ///
    /// The bundle hash, and whether the relay used smart routing.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyBundle`] before any request is made if the bundle has no transactions.
    /// * [`Error::SimulationFailed`] if the simulation reports a failure.
    /// * Any error of [`FlashbotClient::simulate`], then of [`RelayRpcClient::post`].
    #[instrument(
        skip_all,
        fields(
            target_block = target_block,
            txs = bundle.len(),
            replacement_uuid = ?bundle.replacement_uuid
        ),
        err
    )]
    pub async fn broadcast(
        &self,
        bundle: &Bundle,
        target_block: u64,
        options: &BundleOptions,
    ) -> Result<SendBundleResponse> {
        if bundle.is_empty() {
            return Err(Error::EmptyBundle);
        }

        let simulation = self
            .simulate(bundle, target_block, &BundleOptions::default())
            .await?;
        if !simulation.success {
            return Err(Error::SimulationFailed(simulation.error));
        }

        let params = BundleParams::broadcast(bundle, target_block, &self.builders, options)?;

        let response: SendBundleResponse = self.rpc.post(RelayMethod::SendBundle, &params).await?;
        info!(bundle_hash = ?response.bundle_hash, smart = response.smart, "bundle sent");

        Ok(response)
    }

    /// Suggested gas price and priority fee from the chain node.
    ///
    /// # Returns
    ///
    /// `(gas_price, priority_fee)`.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingChainNode`] if no node was configured.
    /// * [`Error::Provider`] if the node fails to answer.
    #[instrument(skip(self), err)]
    pub async fn get_gas_price(&self) -> Result<(U256, U256)> {
        let node = self.node.as_ref().ok_or(Error::MissingChainNode)?;

        futures::try_join!(node.gas_price(), node.max_priority_fee())
    }

    /// Sum of the gas limits declared by the bundle's transactions.
    ///
    /// This is an upper bound set by the signer, not the gas a simulation would use;
    /// see [`SimulateBundleResponse::gas_used`] for that.
    pub fn estimate_gas_bundle(&self, bundle: &Bundle) -> U256 {
        bundle.declared_gas()
    }

    /// Sends a single private transaction (`eth_sendPrivateTransaction`).
    ///
    /// Not implemented yet: always fails with [`Error::NotImplemented`].
    pub async fn send_private_transaction(
        &self,
        _signed_tx: Bytes,
        _expiration_in_blocks: u64,
    ) -> Result<TxHash> {
        Err(Error::NotImplemented(
            RelayMethod::SendPrivateTransaction.as_method_name(),
        ))
    }

    /// Reputation of the signing key on the relay.
    ///
    /// Not implemented yet: always fails with [`Error::NotImplemented`].
    pub async fn get_user_stats(&self, _block_number: u64) -> Result<UserStats> {
        Err(Error::NotImplemented(
            RelayMethod::GetUserStats.as_method_name(),
        ))
    }

    /// Status of a submitted bundle.
    ///
    /// Not implemented yet: always fails with [`Error::NotImplemented`].
    pub async fn get_bundle_stats(
        &self,
        _bundle_hash: TxHash,
        _block_number: u64,
    ) -> Result<BundleStats> {
        Err(Error::NotImplemented(
            RelayMethod::GetBundleStats.as_method_name(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::tests::signed_tx;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    /// Answers each method with a canned body and records what was sent.
    #[derive(Clone, Default)]
    struct RecordingRelay {
        responses: HashMap<&'static str, Value>,
        requests: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl RecordingRelay {
        fn respond(mut self, method: &'static str, body: Value) -> Self {
            self.responses.insert(method, body);
            self
        }

        fn methods(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(_, request)| request["method"].as_str().unwrap().to_string())
                .collect()
        }

        fn request(&self, index: usize) -> (String, Value) {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    impl Transport for RecordingRelay {
        fn send_rpc(
            &self,
            _url: &str,
            signature: &str,
            body: Vec<u8>,
        ) -> impl Future<Output = Result<String>> + Send {
            let request: Value = serde_json::from_slice(&body).unwrap();
            let method = request["method"].as_str().unwrap().to_string();
            let response = self
                .responses
                .get(method.as_str())
                .cloned()
                .unwrap_or(json!({
                    "id": 1,
                    "error": { "code": -32601, "message": "method not found" }
                }));
            self.requests
                .lock()
                .unwrap()
                .push((signature.to_string(), request));

            async move { Ok(response.to_string()) }
        }
    }

    struct FixedGas(u64, u64);

    impl GasOracle for FixedGas {
        fn gas_price(&self) -> impl Future<Output = Result<U256>> + Send {
            let price = self.0;
            async move { Ok(price.into()) }
        }

        fn max_priority_fee(&self) -> impl Future<Output = Result<U256>> + Send {
            let tip = self.1;
            async move { Ok(tip.into()) }
        }
    }

    fn simulation(success: bool) -> Value {
        json!({
            "id": 1,
            "result": {
                "success": success,
                "error": if success { Value::Null } else { json!("execution reverted") },
                "stateBlock": "0x3e7",
                "mevGasPrice": "0x0",
                "profit": "0x0",
                "refundableValue": "0x0",
                "gasUsed": "0x5208",
            }
        })
    }

    fn sent() -> Value {
        json!({
            "id": 1,
            "result": { "bundleHash": format!("0x{}", "ab".repeat(32)), "smart": true }
        })
    }

    fn client(relay: &RecordingRelay) -> FlashbotClient<Provider<Http>, RecordingRelay> {
        FlashbotClient::new(Network::Sepolia).with_transport(relay.clone())
    }

    fn bundle() -> Bundle {
        Bundle::builder()
            .transactions(vec![signed_tx(0, 21_000)])
            .build()
    }

    #[tokio::test]
    async fn empty_bundle_makes_no_request() {
        let relay = RecordingRelay::default()
            .respond("mev_simBundle", simulation(true))
            .respond("mev_sendBundle", sent());
        let client = client(&relay);
        let empty = Bundle::default();

        assert!(matches!(
            client.simulate(&empty, 1000, &BundleOptions::new()).await,
            Err(Error::EmptyBundle)
        ));
        assert!(matches!(
            client.broadcast(&empty, 1000, &BundleOptions::new()).await,
            Err(Error::EmptyBundle)
        ));
        assert!(relay.methods().is_empty());
    }

    #[tokio::test]
    async fn simulate_sends_signed_sim_bundle() {
        let relay = RecordingRelay::default().respond("mev_simBundle", simulation(true));
        let client = client(&relay);

        let result = client
            .simulate(&bundle(), 1000, &BundleOptions::new())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.gas_used, U256::from(21_000));

        let (signature, request) = relay.request(0);
        assert_eq!(request["jsonrpc"], "2.0");
        assert_eq!(request["method"], "mev_simBundle");
        assert!(request["id"].as_u64().unwrap() < 1_000_000);
        assert_eq!(request["params"][0]["inclusion"], json!({ "block": "0x3e8" }));
        assert!(signature.starts_with(&ethers::utils::to_checksum(&client.auth_address(), None)));
    }

    #[tokio::test]
    async fn broadcast_simulates_then_sends() {
        let relay = RecordingRelay::default()
            .respond("mev_simBundle", simulation(true))
            .respond("mev_sendBundle", sent());
        let client = client(&relay).with_builders(vec!["flashbots".to_string()]);

        let response = client
            .broadcast(&bundle(), 1000, &BundleOptions::new())
            .await
            .unwrap();
        assert!(response.smart);
        assert_eq!(response.bundle_hash, TxHash::repeat_byte(0xab));

        assert_eq!(relay.methods(), ["mev_simBundle", "mev_sendBundle"]);

        let (_, simulate) = relay.request(0);
        assert_eq!(simulate["params"][0]["inclusion"], json!({ "block": "0x3e8" }));

        let (_, send) = relay.request(1);
        assert_eq!(
            send["params"][0]["inclusion"],
            json!({ "block": "0x3e8", "maxBlock": "0x406" })
        );
        assert_eq!(send["params"][0]["privacy"]["builders"], json!(["flashbots"]));
    }

    #[tokio::test]
    async fn broadcast_applies_options_to_send_only() {
        let relay = RecordingRelay::default()
            .respond("mev_simBundle", simulation(true))
            .respond("mev_sendBundle", sent());
        let options = BundleOptions::new().expiration_duration_in_blocks(5);

        client(&relay)
            .broadcast(&bundle(), 1000, &options)
            .await
            .unwrap();

        let (_, simulate) = relay.request(0);
        assert!(simulate["params"][0]["inclusion"].get("maxBlock").is_none());
        let (_, send) = relay.request(1);
        assert_eq!(send["params"][0]["inclusion"]["maxBlock"], "0x3ed");
    }

    #[tokio::test]
    async fn relay_error_on_simulate_stops_broadcast() {
        let relay = RecordingRelay::default()
            .respond(
                "mev_simBundle",
                json!({ "id": 1, "error": { "code": -32000, "message": "nonce too low" } }),
            )
            .respond("mev_sendBundle", sent());

        let error = client(&relay)
            .broadcast(&bundle(), 1000, &BundleOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Relay { code: -32000, .. }));
        assert_eq!(relay.methods(), ["mev_simBundle"]);
    }

    #[tokio::test]
    async fn failed_simulation_stops_broadcast() {
        let relay = RecordingRelay::default()
            .respond("mev_simBundle", simulation(false))
            .respond("mev_sendBundle", sent());

        let error = client(&relay)
            .broadcast(&bundle(), 1000, &BundleOptions::new())
            .await
            .unwrap_err();

        match error {
            Error::SimulationFailed(reason) => {
                assert_eq!(reason.as_deref(), Some("execution reverted"))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(relay.methods(), ["mev_simBundle"]);
    }

    #[tokio::test]
    async fn option_failure_is_reported_without_send() {
        let relay = RecordingRelay::default()
            .respond("mev_simBundle", simulation(true))
            .respond("mev_sendBundle", sent());
        let options = BundleOptions::new().expiration_duration_in_blocks(5);

        let error = client(&relay)
            .broadcast(&bundle(), 0, &options)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::OptionApplication { index: 0, .. }));
        assert_eq!(relay.methods(), ["mev_simBundle"]);
    }

    #[tokio::test]
    async fn gas_price_comes_from_node() {
        let relay = RecordingRelay::default();

        let without_node = client(&relay);
        assert!(matches!(
            without_node.get_gas_price().await,
            Err(Error::MissingChainNode)
        ));

        let with_node = client(&relay).with_chain_node(FixedGas(30, 2));
        assert_eq!(
            with_node.get_gas_price().await.unwrap(),
            (U256::from(30), U256::from(2))
        );
        assert!(relay.methods().is_empty());
    }

    #[tokio::test]
    async fn estimate_sums_declared_gas() {
        let bundle = Bundle::builder()
            .transactions(vec![signed_tx(0, 21_000), signed_tx(1, 90_000)])
            .build();

        assert_eq!(
            FlashbotClient::default().estimate_gas_bundle(&bundle),
            U256::from(111_000)
        );
    }

    #[tokio::test]
    async fn unimplemented_methods_fail_loudly() {
        let relay = RecordingRelay::default();
        let client = client(&relay);

        assert!(matches!(
            client.send_private_transaction(Bytes::default(), 25).await,
            Err(Error::NotImplemented("eth_sendPrivateTransaction"))
        ));
        assert!(matches!(
            client.get_user_stats(1).await,
            Err(Error::NotImplemented(_))
        ));
        assert!(matches!(
            client.get_bundle_stats(TxHash::zero(), 1).await,
            Err(Error::NotImplemented(_))
        ));
        assert!(relay.methods().is_empty());
    }

    #[test]
    fn configuration() {
        let auth = LocalWallet::new(&mut thread_rng());
        let client = FlashbotClient::new(Network::Mainnet)
            .with_auth_wallet(auth.clone())
            .with_relay_url("http://localhost:8545")
            .with_chain_id(17_000)
            .with_builders(vec!["titan".to_string()]);

        assert_eq!(client.auth_address(), auth.address());
        assert_eq!(client.relay_url(), "http://localhost:8545");
        assert_eq!(client.chain_id(), 17_000);
        assert_eq!(client.builders(), ["titan".to_string()]);

        let defaults = FlashbotClient::default();
        assert_eq!(defaults.relay_url(), "https://relay.flashbots.net");
        assert_eq!(defaults.chain_id(), 1);
        assert_ne!(defaults.auth_address(), FlashbotClient::default().auth_address());
    }
}
