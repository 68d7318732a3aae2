use crate::Result;
use ethers::providers::{JsonRpcClient, Middleware, Provider};
use ethers::types::U256;
use std::future::Future;

/// Source of gas price suggestions, usually an Ethereum node.
pub trait GasOracle: Send + Sync {
    /// Suggested legacy gas price (`eth_gasPrice`).
    fn gas_price(&self) -> impl Future<Output = Result<U256>> + Send;

    /// Suggested priority fee, i.e. the tip for EIP-1559 transactions (`eth_maxPriorityFeePerGas`).
    fn max_priority_fee(&self) -> impl Future<Output = Result<U256>> + Send;
}

impl<P: JsonRpcClient> GasOracle for Provider<P> {
    fn gas_price(&self) -> impl Future<Output = Result<U256>> + Send {
        async move { Ok(self.get_gas_price().await?) }
    }

    fn max_priority_fee(&self) -> impl Future<Output = Result<U256>> + Send {
        async move { Ok(self.request("eth_maxPriorityFeePerGas", ()).await?) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::providers::MockProvider;

    #[tokio::test]
    async fn queries_node() {
        let (provider, mock) = Provider::mocked();

        mock.push(U256::from(30_000_000_000u64)).unwrap();
        assert_eq!(
            provider.gas_price().await.unwrap(),
            U256::from(30_000_000_000u64)
        );

        mock.push(U256::from(1_500_000_000u64)).unwrap();
        assert_eq!(
            provider.max_priority_fee().await.unwrap(),
            U256::from(1_500_000_000u64)
        );
    }

    #[tokio::test]
    async fn node_failures_surface() {
        let provider = Provider::new(MockProvider::new());

        assert!(matches!(
            provider.gas_price().await,
            Err(crate::Error::Provider(_))
        ));
    }
}
