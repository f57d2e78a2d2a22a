//! Orchestration configuration.

use alloy::primitives::{Address, U256, address};
use serde::{Deserialize, Serialize};
use url::Url;

/// Contract addresses the orchestration core depends on.
///
/// The default set is the canonical deterministic deployment, live at the
/// same addresses on every chain it was deployed to; [`Self::for_chain`]
/// gates it behind the chains this crate has been run against. Everything
/// else is caller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyContracts {
    /// Implementation contract every proxy delegates to.
    pub master_copy: Address,
    /// Factory that deploys proxies and hosts the transaction hash helper.
    pub proxy_factory: Address,
    /// The multi-send aggregator.
    pub multi_send: Address,
    /// Handler for calls the proxy itself does not implement.
    pub fallback_handler: Address,
}

impl Default for ProxyContracts {
    fn default() -> Self {
        Self {
            master_copy: address!("0x34CfAC646f301356fAa8B21e94227e3583Fe3F5F"),
            proxy_factory: address!("0x0fB4340432e56c014fa96286de17222822a9281b"),
            multi_send: address!("0xB522a9f781924eD250A11C54105E51840B138AdD"),
            fallback_handler: address!("0x40A930851BD2e590Bd5A5C981b436de25742E980"),
        }
    }
}

impl ProxyContracts {
    /// The canonical contract set for `chain_id`, if the deterministic
    /// deployment exists there.
    pub fn for_chain(chain_id: u64) -> Option<Self> {
        match chain_id {
            // mainnet, rinkeby, xdai
            1 | 4 | 100 => Some(Self::default()),
            _ => None,
        }
    }
}

/// Relay service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Base endpoint of the relay service.
    pub url: Url,
    /// Factory override for relay-deployed proxies.
    ///
    /// The relay deploys through its own factory; when set, it replaces
    /// [`ProxyContracts::proxy_factory`] for the whole session so that hash
    /// computation and deployment agree on the factory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_factory: Option<Address>,
}

/// Gas and refund parameters of a proxy transaction.
///
/// Every field defaults to zero / the zero address and is used uniformly on
/// both submission paths. Whether relay fee economics require non-zero
/// values is a caller decision; this is a configuration point, not a
/// constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafeTxGasParams {
    /// Gas made available to the proxy's internal execution.
    pub safe_tx_gas: U256,
    /// Gas reserved for data costs and refund bookkeeping.
    pub data_gas: U256,
    /// Price per gas unit refunded to the submitter.
    pub gas_price: U256,
    /// Token the refund is paid in; zero address means native currency.
    pub gas_token: Address,
    /// Recipient of the refund; zero address means the submitter.
    pub refund_receiver: Address,
}

/// Configuration of one orchestration session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationConfig {
    /// Contract addresses to orchestrate against.
    #[serde(default)]
    pub contracts: ProxyContracts,
    /// Relay configuration. When set, batches go through the relay service;
    /// when unset, they are submitted directly under the owner's funds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<RelayConfig>,
    /// Gas and refund parameters applied to every batch.
    #[serde(default)]
    pub gas: SafeTxGasParams,
}

impl OrchestrationConfig {
    /// A direct-submission session against the canonical contract set for
    /// `chain_id`.
    pub fn for_chain(chain_id: u64) -> Option<Self> {
        Some(Self {
            contracts: ProxyContracts::for_chain(chain_id)?,
            relay: None,
            gas: SafeTxGasParams::default(),
        })
    }

    /// Enables the relay path.
    pub fn with_relay(mut self, relay: RelayConfig) -> Self {
        self.relay = Some(relay);
        self
    }

    /// The factory address the session should use: the relay's own factory
    /// when relaying is enabled and provides one, the canonical factory
    /// otherwise.
    pub fn proxy_factory(&self) -> Address {
        self.relay
            .as_ref()
            .and_then(|relay| relay.proxy_factory)
            .unwrap_or(self.contracts.proxy_factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_contracts_are_complete() {
        let contracts = ProxyContracts::for_chain(1).unwrap();
        assert!(!contracts.master_copy.is_zero());
        assert!(!contracts.proxy_factory.is_zero());
        assert!(!contracts.multi_send.is_zero());
        assert!(!contracts.fallback_handler.is_zero());
        assert_eq!(ProxyContracts::for_chain(1), ProxyContracts::for_chain(100));
        assert_eq!(ProxyContracts::for_chain(31337), None);
    }

    #[test]
    fn gas_params_default_to_zero() {
        let gas = SafeTxGasParams::default();
        assert_eq!(gas.safe_tx_gas, U256::ZERO);
        assert_eq!(gas.data_gas, U256::ZERO);
        assert_eq!(gas.gas_price, U256::ZERO);
        assert!(gas.gas_token.is_zero());
        assert!(gas.refund_receiver.is_zero());
    }

    #[test]
    fn relay_factory_overrides_canonical() {
        let config = OrchestrationConfig::for_chain(1).unwrap();
        let canonical = config.contracts.proxy_factory;

        let relay_factory = Address::repeat_byte(0x11);
        let relayed = config.clone().with_relay(RelayConfig {
            url: "https://relay.example".parse().unwrap(),
            proxy_factory: Some(relay_factory),
        });

        assert_eq!(config.proxy_factory(), canonical);
        assert_eq!(relayed.proxy_factory(), relay_factory);
    }
}
