//! Execution dispatcher.
//!
//! One [`ExecutionContext`] per orchestration session: it holds the resolved
//! capabilities and drives each call through the stage sequence, failing
//! fast on the first error. No stage retries; re-running the whole call is
//! cheap and safe, since every read is idempotent and signing the same hash
//! twice authorizes the same action.

use crate::{
    chain::{ChainApi, RpcChain},
    config::{OrchestrationConfig, ProxyContracts, SafeTxGasParams},
    error::{ExecutionError, PreconditionError},
    managers::{DirectManager, ProxyContext, RelayedManager, TransactionManager},
    metrics::OrchestrationMetrics,
    proxy::ProxyState,
    relay::HttpRelayClient,
    signers::MessageSigner,
    signing::sign_batch,
    types::{Batch, ProxyTransaction, StandardTransaction, TransactionResult},
};
use alloy::{primitives::Address, providers::Provider};
use std::{fmt, sync::Arc};
use tracing::{debug, instrument};

/// Stage of an orchestration call.
///
/// Transitions are strictly sequential; any failure moves directly to
/// [`ExecutionStage::Failed`] carrying the originating error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionStage {
    /// No call in flight.
    #[default]
    Idle,
    /// Materializing defaulted transaction fields.
    Normalizing,
    /// Packaging the batch.
    Encoding,
    /// Probing deployment and fetching the nonce.
    ResolvingState,
    /// Computing and signing the proxy transaction hash.
    Signing,
    /// Handing the signed request to the transaction manager.
    Dispatching,
    /// The call returned a transaction handle.
    Succeeded,
    /// The call surfaced an error.
    Failed,
}

impl ExecutionStage {
    /// Whether the stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for ExecutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Idle => "idle",
            Self::Normalizing => "normalizing",
            Self::Encoding => "encoding",
            Self::ResolvingState => "resolving-state",
            Self::Signing => "signing",
            Self::Dispatching => "dispatching",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(stage)
    }
}

/// An orchestration session for one proxy account.
///
/// Composition over three capabilities: a chain reader, a signing adapter
/// and a transaction manager, plus the session's contract addresses and gas
/// parameters. Nothing here is cached across calls; in particular the proxy
/// state is resolved fresh on every call.
#[derive(Clone)]
pub struct ExecutionContext {
    chain: Arc<dyn ChainApi>,
    signer: Arc<dyn MessageSigner>,
    manager: Arc<dyn TransactionManager>,
    proxy: Address,
    contracts: ProxyContracts,
    gas: SafeTxGasParams,
    metrics: Arc<OrchestrationMetrics>,
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("proxy", &self.proxy)
            .field("owner", &self.signer.address())
            .field("contracts", &self.contracts)
            .finish_non_exhaustive()
    }
}

impl ExecutionContext {
    /// Creates a session from explicit capabilities.
    pub fn new(
        chain: Arc<dyn ChainApi>,
        signer: Arc<dyn MessageSigner>,
        manager: Arc<dyn TransactionManager>,
        proxy: Address,
        contracts: ProxyContracts,
        gas: SafeTxGasParams,
    ) -> Self {
        Self {
            chain,
            signer,
            manager,
            proxy,
            contracts,
            gas,
            metrics: Arc::new(OrchestrationMetrics::default()),
        }
    }

    /// Creates a session over an RPC provider, selecting the transaction
    /// manager from the config's relay flag.
    ///
    /// With relaying enabled the relay's own proxy factory, when configured,
    /// replaces the canonical one for the whole session, so that hash
    /// computation and deployment agree on the factory.
    pub fn with_provider<P>(
        provider: P,
        signer: Arc<dyn MessageSigner>,
        proxy: Address,
        config: OrchestrationConfig,
    ) -> Self
    where
        P: Provider + Clone + 'static,
    {
        let mut contracts = config.contracts;
        contracts.proxy_factory = config.proxy_factory();

        let chain = Arc::new(RpcChain::new(provider.clone(), contracts.proxy_factory));
        let manager: Arc<dyn TransactionManager> = match &config.relay {
            Some(relay) => {
                Arc::new(RelayedManager::new(HttpRelayClient::new(relay.url.clone())))
            }
            None => Arc::new(DirectManager::new(provider)),
        };

        Self::new(chain, signer, manager, proxy, contracts, config.gas)
    }

    /// The proxy account this session executes through.
    pub fn proxy(&self) -> Address {
        self.proxy
    }

    /// The owner account authorizing batches.
    pub fn owner(&self) -> Address {
        self.signer.address()
    }

    /// Executes one or more transactions through the proxy.
    ///
    /// Normalizes and packages the transactions, resolves the proxy's
    /// deployment state and nonce, signs the proxy transaction hash and
    /// hands the signed request to the session's transaction manager. The
    /// returned handle carries the submission hash of whichever path ran.
    #[instrument(skip_all, fields(proxy = %self.proxy, count = transactions.len()))]
    pub async fn exec_transactions(
        &self,
        transactions: Vec<ProxyTransaction>,
    ) -> Result<TransactionResult, ExecutionError> {
        let result = self.execute(transactions).await;

        match &result {
            Ok(TransactionResult::Submitted { .. }) => self.metrics.submitted.increment(1),
            Ok(TransactionResult::Relayed { .. }) => self.metrics.relayed.increment(1),
            Err(err) => {
                self.metrics.failed.increment(1);
                debug!(stage = %ExecutionStage::Failed, %err, "orchestration failed");
            }
        }
        if result.is_ok() {
            debug!(stage = %ExecutionStage::Succeeded, "orchestration succeeded");
        }

        result
    }

    async fn execute(
        &self,
        transactions: Vec<ProxyTransaction>,
    ) -> Result<TransactionResult, ExecutionError> {
        self.check_preconditions()?;

        debug!(stage = %ExecutionStage::Normalizing, "normalizing transactions");
        let txs: Vec<StandardTransaction> =
            transactions.into_iter().map(Into::into).collect();

        debug!(stage = %ExecutionStage::Encoding, "packaging batch");
        let batch = Batch::new(txs, self.contracts.multi_send)?;

        debug!(stage = %ExecutionStage::ResolvingState, "resolving proxy state");
        let state = ProxyState::resolve(&*self.chain, self.proxy).await?;

        debug!(stage = %ExecutionStage::Signing, nonce = %state.nonce, "signing batch");
        let request = sign_batch(
            &*self.chain,
            &*self.signer,
            self.proxy,
            batch,
            state.nonce,
            self.gas,
        )
        .await?;

        debug!(stage = %ExecutionStage::Dispatching, "dispatching signed request");
        let ctx = ProxyContext {
            owner: self.signer.address(),
            state,
            contracts: self.contracts,
            gas: self.gas,
        };
        self.manager.submit(request, &ctx).await
    }

    /// Invariants of a correctly constructed session.
    ///
    /// Signer and manager presence are guaranteed by construction; what
    /// remains are the address-shaped invariants the type system cannot see.
    /// Each violation is a distinct configuration bug, surfaced immediately.
    fn check_preconditions(&self) -> Result<(), PreconditionError> {
        if self.proxy.is_zero() {
            return Err(PreconditionError::ProxyAddress);
        }
        if self.contracts.master_copy.is_zero() {
            return Err(PreconditionError::MasterCopy);
        }
        if self.contracts.fallback_handler.is_zero() {
            return Err(PreconditionError::FallbackHandler);
        }
        if self.contracts.proxy_factory.is_zero() {
            return Err(PreconditionError::ProxyFactory);
        }
        if self.contracts.multi_send.is_zero() {
            return Err(PreconditionError::MultiSend);
        }
        if self.signer.address().is_zero() {
            return Err(PreconditionError::OwnerAccount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ExecutionStage;

    #[test]
    fn only_outcome_stages_are_terminal() {
        for stage in [
            ExecutionStage::Idle,
            ExecutionStage::Normalizing,
            ExecutionStage::Encoding,
            ExecutionStage::ResolvingState,
            ExecutionStage::Signing,
            ExecutionStage::Dispatching,
        ] {
            assert!(!stage.is_terminal(), "{stage}");
        }
        assert!(ExecutionStage::Succeeded.is_terminal());
        assert!(ExecutionStage::Failed.is_terminal());
    }
}
