pub use crate::api::networks::Network;
pub use crate::api::types::{
    BundleItem, BundleLogs, BundleOption, BundleOptions, BundleParams, BundleStats, Hint,
    Inclusion, Metadata, Privacy, Refund, RefundConfig, SendBundleResponse,
    SimulateBundleResponse, UserStats, Validity,
};
pub use crate::bundle::Bundle;
pub use crate::client::FlashbotClient;
pub use crate::error::{Error, OptionError};
pub use crate::provider::GasOracle;
