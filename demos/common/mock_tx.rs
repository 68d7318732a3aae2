use crate::common::Config;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::{prelude::*, utils::rlp};
use eyre::Result;
use tokio::try_join;

/// A self-transfer from the sender wallet, signed and ready to bundle.
#[derive(Default)]
pub struct MockTx {
    tip: Option<U256>,
    nonce_add: Option<U256>,
}

impl MockTx {
    /// Extra wei per gas on top of the node's fee estimates.
    pub fn tip(mut self, tip: U256) -> Self {
        self.tip = Some(tip);
        self
    }

    /// Offset from the sender's next nonce, for chaining several mock txs in a bundle.
    pub fn nonce_add<T: Into<U256>>(mut self, nonce_add: T) -> Self {
        self.nonce_add = Some(nonce_add.into());
        self
    }

    pub async fn build(self) -> Result<Transaction> {
        let c = Config::from_env().await?;
        let sender = c.sender_wallet.address();

        let (chain_id, fees, transaction_count) = try_join!(
            c.provider.get_chainid(),
            c.provider.estimate_eip1559_fees(None),
            c.provider.get_transaction_count(sender, None),
        )?;

        let tip = self.tip.unwrap_or_default();
        let nonce = transaction_count + self.nonce_add.unwrap_or_default();

        let tx: TypedTransaction = Eip1559TransactionRequest::new()
            .chain_id(chain_id.as_u64())
            .from(sender)
            .to(sender)
            .nonce(nonce)
            .gas(21_000)
            .max_fee_per_gas(fees.0 + tip)
            .max_priority_fee_per_gas(fees.1 + tip)
            .into();

        let raw = tx.rlp_signed(&c.sender_wallet.sign_transaction_sync(&tx)?);
        Ok(rlp::decode(&raw)?)
    }
}
