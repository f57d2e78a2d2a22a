//! Signature engine.

use crate::{
    chain::ChainApi,
    config::SafeTxGasParams,
    error::ExecutionError,
    signers::MessageSigner,
    types::{Batch, OwnerSignature, ProxyTxParams},
};
use alloy::primitives::{Address, U256};
use tracing::debug;

/// A fully authorized batch, ready for submission.
///
/// Created here, consumed exactly once by a transaction manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// The batch being authorized.
    pub batch: Batch,
    /// The proxy nonce the authorization is bound to.
    pub nonce: U256,
    /// The proxy account executing the batch.
    pub proxy: Address,
    /// Owner signature over the proxy transaction hash, recovery byte in
    /// contract convention.
    pub signature: OwnerSignature,
}

/// Computes the proxy transaction hash for `(proxy, batch, nonce)`, obtains
/// the owner's signature over it, and normalizes the recovery byte.
///
/// The hash comes from the on-chain oracle, so it is deterministic over its
/// inputs; signing the same hash twice authorizes the same action.
pub async fn sign_batch(
    chain: &dyn ChainApi,
    signer: &dyn MessageSigner,
    proxy: Address,
    batch: Batch,
    nonce: U256,
    gas: SafeTxGasParams,
) -> Result<SignedRequest, ExecutionError> {
    let params = ProxyTxParams {
        proxy,
        to: batch.to,
        value: batch.value,
        data: batch.data.clone(),
        operation: batch.operation,
        gas,
        nonce,
    };

    let hash = chain.proxy_transaction_hash(&params).await?;
    debug!(proxy = %proxy, nonce = %nonce, hash = %hash, "computed proxy transaction hash");

    let raw = signer.sign_message(hash.as_slice()).await?;
    let signature = OwnerSignature::from_legacy(&raw)?;

    Ok(SignedRequest { batch, nonce, proxy, signature })
}
