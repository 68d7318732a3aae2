use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod options;
mod send_bundle;
mod simulate_bundle;
mod stats;

pub use options::*;
pub use send_bundle::*;
pub use simulate_bundle::*;
pub use stats::*;

pub const JSON_RPC_VERSION: &str = "2.0";

/// A JSON-RPC request carrying a single params object.
///
/// Fields serialize in declaration order, which keeps the signed bytes stable.
#[derive(Serialize, Debug)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u32,
    pub method: &'static str,
    pub params: [&'a P; 1],
}

impl<'a, P: Serialize> JsonRpcRequest<'a, P> {
    pub fn new(id: u32, method: &'static str, params: &'a P) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION,
            id,
            method,
            params: [params],
        }
    }
}

/// A JSON-RPC response. A present `error` makes the call fail, whatever `result` holds.
#[derive(Deserialize, Debug)]
pub struct JsonRpcResponse {
    pub id: Option<Value>,
    pub result: Option<Value>,
    pub error: Option<JsonRpcError>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl JsonRpcResponse {
    /// Parses the raw response body.
    ///
    /// # Errors
    ///
    /// * [`Error::Deserialization`] if `text` is not a JSON-RPC response.
    pub fn parse(text: String) -> Result<Self> {
        serde_json::from_str(&text).map_err(|source| Error::Deserialization { source, text })
    }

    /// Extracts the typed result.
    ///
    /// # Errors
    ///
    /// * [`Error::Relay`] if an error object is present, with any non-null result attached.
    /// * [`Error::EmptyResult`] if there is neither a result nor an error.
    /// * [`Error::Deserialization`] if the result does not have the expected shape.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self {
                error: Some(JsonRpcError { code, message }),
                result,
                ..
            } => Err(Error::Relay {
                code,
                message,
                partial: result,
            }),
            Self { result: None, .. } => Err(Error::EmptyResult),
            Self {
                result: Some(result),
                ..
            } => T::deserialize(&result).map_err(|source| Error::Deserialization {
                source,
                text: result.to_string(),
            }),
        }
    }
}
