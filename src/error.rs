use ethers::providers::ProviderError;
use ethers::types::{BlockNumber, U64};
use reqwest::header::InvalidHeaderValue;
use serde_json::Value;
use thiserror::Error;

/// The crate `Error` type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Bundle must contain at least one transaction")]
    EmptyBundle,

    #[error("Failed to encode transaction at index {index}: {reason}")]
    Encoding { index: usize, reason: String },

    #[error("Failed to apply bundle option at index {index}: {source}")]
    OptionApplication {
        index: usize,
        #[source]
        source: OptionError,
    },

    #[error("Failed to sign request: {0}")]
    Signing(#[from] ethers::signers::WalletError),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Invalid signature header: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("Failed to deserialize relay response: {text}")]
    Deserialization {
        source: serde_json::Error,
        text: String,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// The relay answered with a JSON-RPC error object.
    ///
    /// `partial` holds the `result` the relay sent alongside the error, if any.
    #[error("Relay error {code}: {message}")]
    Relay {
        code: i64,
        message: String,
        partial: Option<Value>,
    },

    #[error("Relay returned neither a result nor an error")]
    EmptyResult,

    #[error("Bundle simulation failed: {}", .0.as_deref().unwrap_or("no reason given"))]
    SimulationFailed(Option<String>),

    #[error("No chain node configured, see `FlashbotClient::with_chain_node`")]
    MissingChainNode,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl Error {
    /// The partial `result` carried by an [`Error::Relay`], if any.
    pub fn partial_result(&self) -> Option<&Value> {
        match self {
            Self::Relay { partial, .. } => partial.as_ref(),
            _ => None,
        }
    }
}

/// Reasons a [`crate::BundleOption`] can reject the parameters it is applied to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("Cannot offset the expiration from the `{0}` block tag, use an explicit target block")]
    RelativeToTag(BlockNumber),

    #[error("Expiration overflows: block {block} + {duration} blocks")]
    BlockOverflow { block: U64, duration: u64 },
}

/// The crate `Result` type.
pub type Result<T> = core::result::Result<T, Error>;
