use super::{BundleParams, Hint, Metadata, Privacy, Validity};
use crate::error::OptionError;
use crate::{Error, Result};
use ethers::types::{BlockNumber, U64};

/// A single adjustment of [`BundleParams`], see [`BundleOptions`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BundleOption {
    /// Replaces the validity (refund) rules.
    Validity(Validity),
    /// Replaces the privacy settings.
    Privacy(Privacy),
    /// Sets the hints shared with searchers, keeping the rest of the privacy settings.
    PrivacyHints(Vec<Hint>),
    /// Sets the builders to route to, keeping the rest of the privacy settings.
    PrivacyBuilders(Vec<String>),
    /// Replaces the metadata.
    Metadata(Metadata),
    /// Sets the metadata origin id.
    OriginId(String),
    /// Keeps the bundle valid for this many blocks past the target block.
    ExpirationDurationInBlocks(u64),
    /// Keeps the bundle valid up to this block.
    ExpirationBlock(u64),
}

impl BundleOption {
    /// Applies this option to `params`.
    ///
    /// # Errors
    ///
    /// * [`OptionError::RelativeToTag`] when an expiration duration is applied to a tag
    ///   such as `latest` instead of a block number.
    /// * [`OptionError::BlockOverflow`] when the expiration does not fit in a block number.
    pub fn apply(&self, params: &mut BundleParams) -> std::result::Result<(), OptionError> {
        match self {
            Self::Validity(validity) => params.validity = Some(validity.clone()),
            Self::Privacy(privacy) => params.privacy = Some(privacy.clone()),
            Self::PrivacyHints(hints) => {
                params.privacy_mut().hints = Some(hints.iter().copied().collect())
            }
            Self::PrivacyBuilders(builders) => {
                params.privacy_mut().builders = Some(builders.clone())
            }
            Self::Metadata(metadata) => params.metadata = Some(metadata.clone()),
            Self::OriginId(origin_id) => params.metadata_mut().origin_id = Some(origin_id.clone()),
            Self::ExpirationDurationInBlocks(duration) => {
                let block = match params.inclusion.block {
                    BlockNumber::Number(block) => block,
                    tag => return Err(OptionError::RelativeToTag(tag)),
                };
                let max_block = block
                    .checked_add(U64::from(*duration))
                    .ok_or(OptionError::BlockOverflow {
                        block,
                        duration: *duration,
                    })?;
                params.inclusion.max_block = Some(max_block);
            }
            Self::ExpirationBlock(block) => params.inclusion.max_block = Some(U64::from(*block)),
        }

        Ok(())
    }
}

/// Ordered adjustments applied to the request parameters before they are signed.
///
/// Options are applied in the order they were added and each one overwrites what
/// earlier ones wrote to the same field:
///
/// ```ignore
/// let options = BundleOptions::new()
///     .expiration_duration_in_blocks(10)
///     .expiration_block(1_200); // wins, `maxBlock` is 1200
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BundleOptions {
    options: Vec<BundleOption>,
}

impl BundleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn push(mut self, option: BundleOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use]
    pub fn validity(self, validity: Validity) -> Self {
        self.push(BundleOption::Validity(validity))
    }

    #[must_use]
    pub fn privacy(self, privacy: Privacy) -> Self {
        self.push(BundleOption::Privacy(privacy))
    }

    #[must_use]
    pub fn privacy_hints(self, hints: impl IntoIterator<Item = Hint>) -> Self {
        self.push(BundleOption::PrivacyHints(hints.into_iter().collect()))
    }

    #[must_use]
    pub fn privacy_builders(self, builders: Vec<String>) -> Self {
        self.push(BundleOption::PrivacyBuilders(builders))
    }

    #[must_use]
    pub fn metadata(self, metadata: Metadata) -> Self {
        self.push(BundleOption::Metadata(metadata))
    }

    #[must_use]
    pub fn origin_id(self, origin_id: impl Into<String>) -> Self {
        self.push(BundleOption::OriginId(origin_id.into()))
    }

    #[must_use]
    pub fn expiration_duration_in_blocks(self, duration: u64) -> Self {
        self.push(BundleOption::ExpirationDurationInBlocks(duration))
    }

    #[must_use]
    pub fn expiration_block(self, block: u64) -> Self {
        self.push(BundleOption::ExpirationBlock(block))
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BundleOption> {
        self.options.iter()
    }

    /// Applies every option in order, stopping at the first failure.
    pub(crate) fn apply(&self, params: &mut BundleParams) -> Result<()> {
        for (index, option) in self.options.iter().enumerate() {
            option
                .apply(params)
                .map_err(|source| Error::OptionApplication { index, source })?;
        }
        Ok(())
    }
}

impl FromIterator<BundleOption> for BundleOptions {
    fn from_iter<I: IntoIterator<Item = BundleOption>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}
