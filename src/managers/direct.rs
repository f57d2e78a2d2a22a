//! Direct submission through the proxy contract.

use super::{ProxyContext, TransactionManager};
use crate::{
    error::{ChainQueryError, ExecutionError},
    signing::SignedRequest,
    types::{SafeProxy, TransactionResult},
};
use alloy::{providers::Provider, transports::TransportErrorKind};
use async_trait::async_trait;
use tracing::info;

/// Submits batches straight to the proxy's execution entry point, paying gas
/// from the owner account.
///
/// The provider must be able to sign and fund transactions for the owner.
/// Deployment is assumed satisfied by the caller's context; this manager
/// never deploys.
#[derive(Debug, Clone)]
pub struct DirectManager<P> {
    provider: P,
}

impl<P> DirectManager<P> {
    /// Creates a manager submitting through `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider> TransactionManager for DirectManager<P> {
    async fn submit(
        &self,
        request: SignedRequest,
        ctx: &ProxyContext,
    ) -> Result<TransactionResult, ExecutionError> {
        let batch = &request.batch;

        let pending = SafeProxy::new(request.proxy, &self.provider)
            .execTransaction(
                batch.to,
                batch.value,
                batch.data.clone(),
                batch.operation.into(),
                ctx.gas.safe_tx_gas,
                ctx.gas.data_gas,
                ctx.gas.gas_price,
                ctx.gas.gas_token,
                ctx.gas.refund_receiver,
                request.signature.to_bytes(),
            )
            .send()
            .await
            .map_err(TransportErrorKind::custom)
            .map_err(ChainQueryError::from)?;

        let tx_hash = *pending.tx_hash();
        info!(proxy = %request.proxy, %tx_hash, "submitted batch through proxy");

        Ok(TransactionResult::Submitted { tx_hash })
    }
}
