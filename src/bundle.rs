use crate::api::types::BundleItem;
use crate::{Error, Result};
use ethers::types::{Bytes, Transaction, U256};
use typed_builder::TypedBuilder;

/// An ordered set of signed transactions to land atomically in one block.
///
/// Build it with [`Bundle::builder`]:
///
/// ```ignore
/// let bundle = Bundle::builder()
///     .transactions(vec![approve, swap])
///     .can_revert(vec![false, true])
///     .build();
/// ```
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct Bundle {
    /// Signed transactions, in execution order.
    pub transactions: Vec<Transaction>,

    /// Which transactions may revert without invalidating the bundle.
    /// Matched to `transactions` by position; missing entries mean `false`.
    #[builder(default)]
    pub can_revert: Vec<bool>,

    /// Identifier the caller uses to track replacements of this bundle.
    #[builder(default, setter(strip_option, into))]
    pub replacement_uuid: Option<String>,

    /// Builders to route the bundle to. Falls back to the client's builders when empty.
    #[builder(default)]
    pub builders: Vec<String>,
}

impl Bundle {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Whether the transaction at `index` is allowed to revert.
    pub fn reverts_allowed(&self, index: usize) -> bool {
        self.can_revert.get(index).copied().unwrap_or(false)
    }

    /// Sum of the gas limits declared by the transactions.
    ///
    /// This is what the bundle is allowed to burn, not what it actually uses when executed.
    pub fn declared_gas(&self) -> U256 {
        self.transactions
            .iter()
            .fold(U256::zero(), |total, tx| total.saturating_add(tx.gas))
    }

    /// Encodes every transaction into a signed body item.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyBundle`] if there are no transactions.
    /// * [`Error::Encoding`] if a transaction is unsigned or of an unsupported type.
    pub(crate) fn body(&self) -> Result<Vec<BundleItem>> {
        if self.is_empty() {
            return Err(Error::EmptyBundle);
        }

        self.transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                Ok(BundleItem::Signed {
                    tx: encode(tx).map_err(|reason| Error::Encoding { index, reason })?,
                    can_revert: self.reverts_allowed(index),
                })
            })
            .collect()
    }
}

/// Binary (EIP-2718) encoding of a signed transaction.
fn encode(tx: &Transaction) -> std::result::Result<Bytes, String> {
    match tx.transaction_type.map(|kind| kind.as_u64()) {
        None | Some(0..=2) => {}
        Some(other) => return Err(format!("unsupported transaction type {other}")),
    }

    if tx.r.is_zero() && tx.s.is_zero() {
        return Err("transaction is not signed".to_string());
    }

    Ok(tx.rlp())
}
