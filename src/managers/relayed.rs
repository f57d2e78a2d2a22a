//! Relayed submission through the fee-fronting service.

use super::{ProxyContext, TransactionManager};
use crate::{
    constants::PREDETERMINED_SALT_NONCE,
    error::ExecutionError,
    relay::{CreateProxyAndExecTransactionRequest, ExecTransactionRequest, RelayApi},
    signing::SignedRequest,
    types::TransactionResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Submits batches to the relay service, which fronts gas and deploys the
/// proxy on first use.
///
/// Branches on the resolved deployment state: a deployed proxy goes through
/// the execute endpoint, an undeployed one through deploy-and-execute with
/// the fixed deterministic salt. Relay errors surface verbatim; there is no
/// fallback to direct submission.
#[derive(Clone)]
pub struct RelayedManager {
    relay: Arc<dyn RelayApi>,
}

impl RelayedManager {
    /// Creates a manager submitting through `relay`.
    pub fn new(relay: impl RelayApi + 'static) -> Self {
        Self { relay: Arc::new(relay) }
    }
}

impl std::fmt::Debug for RelayedManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayedManager").finish_non_exhaustive()
    }
}

#[async_trait]
impl TransactionManager for RelayedManager {
    async fn submit(
        &self,
        request: SignedRequest,
        ctx: &ProxyContext,
    ) -> Result<TransactionResult, ExecutionError> {
        let batch = &request.batch;

        let response = if ctx.state.is_deployed {
            self.relay
                .execute_transaction(ExecTransactionRequest {
                    from: ctx.owner,
                    proxy_address: request.proxy,
                    to: batch.to,
                    value: batch.value,
                    data: batch.data.clone(),
                    operation: batch.operation,
                    safe_tx_gas: ctx.gas.safe_tx_gas,
                    data_gas: ctx.gas.data_gas,
                    gas_price: ctx.gas.gas_price,
                    gas_token: ctx.gas.gas_token,
                    refund_receiver: ctx.gas.refund_receiver,
                    signature: request.signature.to_bytes(),
                })
                .await?
        } else {
            self.relay
                .create_proxy_and_execute(CreateProxyAndExecTransactionRequest {
                    from: ctx.owner,
                    master_copy_address: ctx.contracts.master_copy,
                    proxy_factory_address: ctx.contracts.proxy_factory,
                    predetermined_salt_nonce: PREDETERMINED_SALT_NONCE,
                    to: batch.to,
                    value: batch.value,
                    data: batch.data.clone(),
                    operation: batch.operation,
                    signature: request.signature.to_bytes(),
                })
                .await?
        };

        let proxy_tx_hash = response.proxy_transaction_hash;
        info!(
            proxy = %request.proxy,
            deployed = ctx.state.is_deployed,
            %proxy_tx_hash,
            "relayed batch"
        );

        Ok(TransactionResult::Relayed { proxy_tx_hash })
    }
}
