//! Read access to chain state.

use crate::{
    error::ChainQueryError,
    types::{ProxyFactory, ProxyTxParams, SafeProxy},
};
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    providers::Provider,
    transports::TransportErrorKind,
};
use async_trait::async_trait;

/// Read-only chain accessor the orchestration core depends on.
///
/// All three queries are idempotent reads; implementations must not retry
/// internally, a failed read is surfaced as [`ChainQueryError`] so the
/// caller can repeat the whole orchestration against fresh state.
#[async_trait]
pub trait ChainApi: Send + Sync {
    /// The code deployed at `address`, empty if none.
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainQueryError>;

    /// The proxy's own execution nonce. Only meaningful for a deployed
    /// proxy.
    async fn proxy_nonce(&self, proxy: Address) -> Result<U256, ChainQueryError>;

    /// The hash the proxy owner must sign to authorize `params`.
    ///
    /// Delegates to the on-chain helper so the signed hash agrees bit for
    /// bit with the verifying contract's computation.
    async fn proxy_transaction_hash(
        &self,
        params: &ProxyTxParams,
    ) -> Result<B256, ChainQueryError>;
}

/// [`ChainApi`] over an RPC provider.
#[derive(Debug, Clone)]
pub struct RpcChain<P> {
    provider: P,
    proxy_factory: Address,
}

impl<P> RpcChain<P> {
    /// Creates a chain accessor that resolves transaction hashes through the
    /// helper hosted on `proxy_factory`.
    pub fn new(provider: P, proxy_factory: Address) -> Self {
        Self { provider, proxy_factory }
    }
}

#[async_trait]
impl<P: Provider> ChainApi for RpcChain<P> {
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainQueryError> {
        Ok(self.provider.get_code_at(address).await?)
    }

    async fn proxy_nonce(&self, proxy: Address) -> Result<U256, ChainQueryError> {
        Ok(SafeProxy::new(proxy, &self.provider)
            .nonce()
            .call()
            .await
            .map_err(TransportErrorKind::custom)?)
    }

    async fn proxy_transaction_hash(
        &self,
        params: &ProxyTxParams,
    ) -> Result<B256, ChainQueryError> {
        Ok(ProxyFactory::new(self.proxy_factory, &self.provider)
            .getTransactionHash(
                params.proxy,
                params.to,
                params.value,
                params.data.clone(),
                params.operation.into(),
                params.gas.safe_tx_gas,
                params.gas.data_gas,
                params.gas.gas_price,
                params.gas.gas_token,
                params.gas.refund_receiver,
                params.nonce,
            )
            .call()
            .await
            .map_err(TransportErrorKind::custom)?)
    }
}
