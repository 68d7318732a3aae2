use super::BundleOptions;
use crate::{Bundle, Result};
use derive_new::new;
use ethers::types::{Address, BlockNumber, Bytes, TxHash, U64};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeSet;

/// Smart bundle protocol version sent with every request.
pub const BUNDLE_VERSION: &str = "v0.1";

/// How many blocks past the target a broadcast bundle stays valid, unless an option says otherwise.
pub const DEFAULT_INCLUSION_WINDOW: u64 = 30;

/// Parameters sent to `mev_simBundle` and `mev_sendBundle`.
#[skip_serializing_none]
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleParams {
    /// Smart bundle protocol version
    pub version: String,
    /// Conditions for the bundle to be considered for inclusion in a block, evaluated _before_ the bundle is placed in a block
    pub inclusion: Inclusion,
    /// Transactions that make up the bundle
    pub body: Vec<BundleItem>,
    /// Conditions for bundle to be considered for inclusion in a block, evaluated _after_ the bundle is placed in the block
    pub validity: Option<Validity>,
    pub privacy: Option<Privacy>,
    pub metadata: Option<Metadata>,
}

impl BundleParams {
    fn new(bundle: &Bundle, target_block: u64) -> Result<Self> {
        Ok(Self {
            version: BUNDLE_VERSION.to_string(),
            inclusion: Inclusion::at(target_block),
            body: bundle.body()?,
            validity: None,
            privacy: None,
            metadata: None,
        })
    }

    /// Parameters for a `mev_simBundle` dry run.
    ///
    /// # Arguments
    ///
    /// * `bundle` - Transactions to simulate
    /// * `target_block` - Block to simulate for, `0` meaning the latest block
    /// * `options` - Applied in order on top of the defaults
    ///
    /// # Errors
    ///
    /// * [`crate::Error::EmptyBundle`], [`crate::Error::Encoding`] for an unusable bundle.
    /// * [`crate::Error::OptionApplication`] for the first option that fails.
    pub fn simulation(bundle: &Bundle, target_block: u64, options: &BundleOptions) -> Result<Self> {
        let mut params = Self::new(bundle, target_block)?;
        options.apply(&mut params)?;
        Ok(params)
    }

    /// Parameters for a `mev_sendBundle` submission.
    ///
    /// Same as [`BundleParams::simulation`], except that before `options` are applied
    /// the inclusion window is extended by [`DEFAULT_INCLUSION_WINDOW`] blocks and the
    /// bundle is routed to its own builders, or to `default_builders` if it names none.
    pub fn broadcast(
        bundle: &Bundle,
        target_block: u64,
        default_builders: &[String],
        options: &BundleOptions,
    ) -> Result<Self> {
        let mut params = Self::new(bundle, target_block)?;

        params.inclusion.max_block =
            Some(U64::from(target_block.saturating_add(DEFAULT_INCLUSION_WINDOW)));

        let builders = if bundle.builders.is_empty() {
            default_builders
        } else {
            bundle.builders.as_slice()
        };
        if !builders.is_empty() {
            params.privacy_mut().builders = Some(builders.to_vec());
        }

        options.apply(&mut params)?;
        Ok(params)
    }

    pub(crate) fn privacy_mut(&mut self) -> &mut Privacy {
        self.privacy.get_or_insert_with(Default::default)
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut Metadata {
        self.metadata.get_or_insert_with(Default::default)
    }
}

/// Block range in which the bundle may be included.
#[skip_serializing_none]
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Inclusion {
    /// Target block number in which to include the bundle.
    pub block: BlockNumber,
    /// Maximum block height in which the bundle can be included.
    pub max_block: Option<U64>,
}

impl Inclusion {
    /// Targets `block`, where `0` stands for the latest block.
    pub fn at(block: u64) -> Self {
        Self {
            block: match block {
                0 => BlockNumber::Latest,
                block => BlockNumber::Number(block.into()),
            },
            max_block: None,
        }
    }
}

/// An entry of the bundle body.
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum BundleItem {
    /// A pending transaction, referenced by hash.
    Hash { hash: TxHash },
    /// A signed transaction.
    Signed {
        tx: Bytes,
        #[serde(rename = "canRevert")]
        can_revert: bool,
    },
    /// A nested bundle.
    Bundle { bundle: Box<BundleParams> },
}

/// Conditions for bundle to be considered for inclusion in a block, evaluated _after_ the bundle is placed in the block.
#[derive(Clone, Serialize, Default, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    /// Conditions for receiving refunds (MEV kickbacks)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refund: Vec<Refund>,
    /// Specifies how refund should be paid if bundle is used by another searcher
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refund_config: Vec<RefundConfig>,
}

/// Conditions for receiving refunds (MEV kickbacks).
#[derive(Clone, Copy, Serialize, Default, Debug, PartialEq, Eq, new)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    /// Index of entry in `body` to which the refund percentage applies.
    pub body_idx: u32,
    /// Minimum refund percentage required for this bundle to be eligible for use by another searcher.
    pub percent: u32,
}

/// Specifies how refund should be paid if bundle is used by another searcher.
#[derive(Clone, Copy, Serialize, Default, Debug, PartialEq, Eq, new)]
#[serde(rename_all = "camelCase")]
pub struct RefundConfig {
    /// The address that receives this portion of the refund.
    pub address: Address,
    /// Percentage of refund to be paid to `address`.
    /// Set this to `100` unless splitting refunds between multiple recipients.
    pub percent: u32,
}

/// Privacy settings for the submitted bundle.
#[skip_serializing_none]
#[derive(Clone, Serialize, Default, Debug, PartialEq, Eq)]
pub struct Privacy {
    pub hints: Option<BTreeSet<Hint>>,
    pub builders: Option<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Default, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub origin_id: Option<String>,
}

/// Data about a transaction shared with searchers.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    /// Share the calldata of the transaction.
    Calldata,
    /// Share the contract address of the transaction.
    ContractAddress,
    /// Share the logs emitted by the transaction.
    Logs,
    /// Share the 4byte function selector of the transaction.
    FunctionSelector,
    /// Share the bundle hash.
    Hash,
    /// Share tx hashes of transactions in bundle.
    TxHash,
    /// Share everything.
    Full,
}

/// Acknowledgment of `mev_sendBundle`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendBundleResponse {
    pub bundle_hash: TxHash,
    /// Whether the relay routed the bundle through its smart routing layer.
    #[serde(default)]
    pub smart: bool,
}
