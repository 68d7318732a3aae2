use crate::api::signer::{sign_request, SIGNATURE_HEADER};
use crate::api::types::{JsonRpcRequest, JsonRpcResponse};
use crate::Result;
use ethers::core::rand::{thread_rng, Rng};
use ethers::signers::LocalWallet;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use tracing::*;

/// Request ids are drawn from `0..MAX_REQUEST_ID`.
const MAX_REQUEST_ID: u32 = 1_000_000;

/// JSON-RPC methods understood by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMethod {
    SimBundle,
    SendBundle,
    SendPrivateTransaction,
    GetUserStats,
    GetBundleStats,
}

impl RelayMethod {
    pub fn as_method_name(&self) -> &'static str {
        match &self {
            Self::SimBundle => "mev_simBundle",
            Self::SendBundle => "mev_sendBundle",
            Self::SendPrivateTransaction => "eth_sendPrivateTransaction",
            Self::GetUserStats => "flashbots_getUserStatsV2",
            Self::GetBundleStats => "flashbots_getBundleStatsV2",
        }
    }
}

/// Carries signed request bodies to the relay.
///
/// Implemented for [`reqwest::Client`]; swap it to reuse a configured HTTP client
/// (timeouts, proxies) or to stand in for the relay in tests.
pub trait Transport: Send + Sync {
    /// POSTs `body` to `url` with `signature` as the authentication header.
    ///
    /// # Returns
    ///
    /// The raw response body, whatever the HTTP status.
    fn send_rpc(
        &self,
        url: &str,
        signature: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl Transport for reqwest::Client {
    fn send_rpc(
        &self,
        url: &str,
        signature: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<String>> + Send {
        let request = signature_headers(signature)
            .map(|headers| self.post(url).headers(headers).body(body));

        async move {
            // relays report JSON-RPC errors with 4xx statuses, the body is what matters
            let response = request?.send().await?.text().await?;
            Ok(response)
        }
    }
}

fn signature_headers(signature: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(signature)?);
    Ok(headers)
}

/// Signs and sends JSON-RPC requests to a relay.
#[derive(Debug, Clone)]
pub struct RelayRpcClient<T> {
    url: String,
    transport: T,
    auth_wallet: LocalWallet,
}

impl<T: Transport> RelayRpcClient<T> {
    pub fn new(url: impl Into<String>, transport: T, auth_wallet: LocalWallet) -> Self {
        Self {
            url: url.into(),
            transport,
            auth_wallet,
        }
    }

    /// Sends a signed POST request to the relay and returns the data.
    ///
    /// The envelope is serialized once; those exact bytes are both signed and sent.
    ///
    /// # Arguments
    ///
    /// * `method` - JSON-RPC method
    /// * `params` - The single params object
    ///
    /// # Returns
    ///
    /// The decoded `result` of the response.
    ///
    /// # Errors
    ///
    /// * [`crate::Error::Signing`] if the request cannot be signed.
    /// * [`crate::Error::Transport`] if the request fails.
    /// * [`crate::Error::Relay`], [`crate::Error::EmptyResult`], [`crate::Error::Deserialization`]
    ///   depending on what the relay answered.
    #[instrument(skip(self, method, params), fields(method = method.as_method_name(), id = field::Empty))]
    pub async fn post<P, R>(&self, method: RelayMethod, params: &P) -> Result<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let id = thread_rng().gen_range(0..MAX_REQUEST_ID);
        Span::current().record("id", id);

        let body = serde_json::to_vec(&JsonRpcRequest::new(
            id,
            method.as_method_name(),
            params,
        ))?;
        trace!(request = %String::from_utf8_lossy(&body));

        let signature = sign_request(&self.auth_wallet, &body).await?;
        trace!(%signature);

        let response = self.transport.send_rpc(&self.url, &signature, body).await?;
        trace!(%response);

        JsonRpcResponse::parse(response)?.into_result()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn auth_wallet(&self) -> &LocalWallet {
        &self.auth_wallet
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_auth_wallet(&mut self, auth_wallet: LocalWallet) {
        self.auth_wallet = auth_wallet;
    }

    pub fn with_transport<U: Transport>(self, transport: U) -> RelayRpcClient<U> {
        RelayRpcClient {
            url: self.url,
            transport,
            auth_wallet: self.auth_wallet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_signature() {
        let headers = signature_headers("0xabc:0xdef").unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[SIGNATURE_HEADER], "0xabc:0xdef");
    }

    #[test]
    fn unusable_signature_is_rejected() {
        assert!(matches!(
            signature_headers("bad\nheader"),
            Err(crate::Error::InvalidHeader(_))
        ));
    }
}
