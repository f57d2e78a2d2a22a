//! Proxy transaction types.

use crate::{config::SafeTxGasParams, error::EncodingError};
use alloy::primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};

/// How the proxy performs a call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationType {
    /// A plain `CALL` from the proxy.
    #[default]
    Call = 0,
    /// A `DELEGATECALL` executed in the proxy's own context.
    DelegateCall = 1,
}

impl From<OperationType> for u8 {
    fn from(operation: OperationType) -> Self {
        operation as u8
    }
}

impl TryFrom<u8> for OperationType {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(EncodingError::UnknownOperation(other)),
        }
    }
}

/// A caller-requested on-chain call.
///
/// Only `to` is mandatory; the remaining fields are defaulted during
/// normalization. A payload without a target is rejected at this boundary
/// (the field is required both by the type and by serde), never defaulted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyTransaction {
    /// The call target.
    pub to: Address,
    /// Amount of native value to send to the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// The calldata bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// How the proxy performs the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationType>,
}

impl ProxyTransaction {
    /// A plain call with no value and no calldata.
    pub fn call(to: Address) -> Self {
        Self { to, value: None, data: None, operation: None }
    }
}

/// A [`ProxyTransaction`] with every field materialized.
///
/// Produced and consumed within a single orchestration call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardTransaction {
    /// How the proxy performs the call.
    pub operation: OperationType,
    /// The call target.
    pub to: Address,
    /// Amount of native value to send to the target.
    pub value: U256,
    /// The calldata bytes.
    pub data: Bytes,
}

impl From<ProxyTransaction> for StandardTransaction {
    fn from(tx: ProxyTransaction) -> Self {
        Self {
            operation: tx.operation.unwrap_or_default(),
            to: tx.to,
            value: tx.value.unwrap_or(U256::ZERO),
            data: tx.data.unwrap_or_default(),
        }
    }
}

/// Input of the on-chain transaction hash oracle.
///
/// The verifying contract computes the same hash over these fields; the two
/// computations must agree bit for bit for the signature to verify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyTxParams {
    /// The proxy account being executed through.
    pub proxy: Address,
    /// The resolved call target.
    pub to: Address,
    /// Native value forwarded with the call.
    pub value: U256,
    /// The resolved calldata.
    pub data: Bytes,
    /// How the proxy performs the call.
    pub operation: OperationType,
    /// Gas and refund parameters, zero by default.
    pub gas: SafeTxGasParams,
    /// The proxy's execution nonce.
    pub nonce: U256,
}

/// Terminal value of an orchestration call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionResult {
    /// The batch was submitted directly, under the owner's own funds.
    Submitted {
        /// Hash of the submitted transaction.
        tx_hash: B256,
    },
    /// The batch was handed to the relay service.
    Relayed {
        /// Hash of the proxy transaction as reported by the relay.
        proxy_tx_hash: B256,
    },
}

impl TransactionResult {
    /// The hash of the submitted transaction, for either path.
    pub fn hash(&self) -> B256 {
        match self {
            Self::Submitted { tx_hash } => *tx_hash,
            Self::Relayed { proxy_tx_hash } => *proxy_tx_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn normalization_defaults_optional_fields() {
        let to = address!("0x00000000000000000000000000000000000000aa");
        let tx = StandardTransaction::from(ProxyTransaction::call(to));

        assert_eq!(
            tx,
            StandardTransaction {
                operation: OperationType::Call,
                to,
                value: U256::ZERO,
                data: Bytes::new(),
            }
        );
    }

    #[test]
    fn normalization_preserves_explicit_fields() {
        let tx = StandardTransaction::from(ProxyTransaction {
            to: Address::repeat_byte(0xbb),
            value: Some(U256::from(7)),
            data: Some(Bytes::from_static(&[0xde, 0xad])),
            operation: Some(OperationType::DelegateCall),
        });

        assert_eq!(tx.operation, OperationType::DelegateCall);
        assert_eq!(tx.value, U256::from(7));
        assert_eq!(tx.data, Bytes::from_static(&[0xde, 0xad]));
    }

    #[test]
    fn missing_target_is_rejected() {
        assert!(serde_json::from_str::<ProxyTransaction>(r#"{"value":"0x1"}"#).is_err());

        let tx: ProxyTransaction = serde_json::from_str(
            r#"{"to":"0x00000000000000000000000000000000000000aa"}"#,
        )
        .unwrap();
        assert_eq!(tx.value, None);
        assert_eq!(tx.data, None);
    }

    #[test]
    fn operation_round_trips_through_u8() {
        assert_eq!(OperationType::try_from(0u8).unwrap(), OperationType::Call);
        assert_eq!(OperationType::try_from(1u8).unwrap(), OperationType::DelegateCall);
        assert!(OperationType::try_from(2u8).is_err());
    }
}
