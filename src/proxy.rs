//! Proxy account state resolution.

use crate::{chain::ChainApi, error::ChainQueryError};
use alloy::primitives::{Address, U256};
use tracing::debug;

/// On-chain state of the proxy account at the time of one orchestration
/// call.
///
/// Recomputed fresh for every call and never cached: executing a batch can
/// deploy the proxy or advance its nonce, so yesterday's answer is wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProxyState {
    /// The deterministic proxy account address.
    pub address: Address,
    /// Whether code exists at the address.
    pub is_deployed: bool,
    /// The proxy's execution nonce; 0 when not deployed, the value a fresh
    /// deployment starts with.
    pub nonce: U256,
}

impl ProxyState {
    /// Resolves the proxy's deployment state and nonce.
    ///
    /// The code probe and the nonce fetch are independent reads and run
    /// concurrently; the nonce result is only consulted when the probe finds
    /// code, so an undeployed proxy never surfaces a nonce error.
    pub async fn resolve(chain: &dyn ChainApi, address: Address) -> Result<Self, ChainQueryError> {
        let (code, nonce) = tokio::join!(chain.code_at(address), chain.proxy_nonce(address));

        let is_deployed = !code?.is_empty();
        let nonce = if is_deployed { nonce? } else { U256::ZERO };

        debug!(proxy = %address, is_deployed, nonce = %nonce, "resolved proxy state");
        Ok(Self { address, is_deployed, nonce })
    }
}
