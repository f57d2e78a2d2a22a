//! Transaction submission strategies.
//!
//! Both managers take the same fully-signed request and produce an
//! equivalent on-chain effect; they differ only in who pays for gas and in
//! whether the proxy can be deployed on the way. The manager is selected
//! once per session, at context construction, never per call.

use crate::{
    config::{ProxyContracts, SafeTxGasParams},
    error::ExecutionError,
    proxy::ProxyState,
    signing::SignedRequest,
    types::TransactionResult,
};
use alloy::primitives::Address;
use async_trait::async_trait;

mod direct;
pub use direct::DirectManager;

mod relayed;
pub use relayed::RelayedManager;

/// Session state a manager needs alongside the signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyContext {
    /// The owner account that authorized the batch.
    pub owner: Address,
    /// The proxy state the request was signed against.
    pub state: ProxyState,
    /// Contract addresses of the session.
    pub contracts: ProxyContracts,
    /// Gas and refund parameters of the session.
    pub gas: SafeTxGasParams,
}

/// A submission strategy for signed batches.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Submits the request and returns a handle to the resulting
    /// transaction.
    async fn submit(
        &self,
        request: SignedRequest,
        ctx: &ProxyContext,
    ) -> Result<TransactionResult, ExecutionError>;
}
