//! Orchestration error types.

use alloy::{
    primitives::U256,
    transports::{RpcError, TransportErrorKind},
};
use thiserror::Error;

/// A malformed orchestration context.
///
/// Every variant is an invariant of a correctly constructed context; hitting
/// one is a caller configuration bug, not a runtime condition to recover
/// from, so these are never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    /// The proxy account address is unset.
    #[error("proxy address is not configured")]
    ProxyAddress,
    /// The master copy address is unset.
    #[error("master copy address is not configured")]
    MasterCopy,
    /// The fallback handler address is unset.
    #[error("fallback handler address is not configured")]
    FallbackHandler,
    /// The proxy factory address is unset.
    #[error("proxy factory address is not configured")]
    ProxyFactory,
    /// The multi-send aggregator address is unset.
    #[error("multi-send address is not configured")]
    MultiSend,
    /// The signer does not resolve to an owner account.
    #[error("owner account is not resolvable")]
    OwnerAccount,
}

/// An error while encoding or decoding a batch.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The batch has no transactions.
    #[error("cannot encode an empty batch")]
    EmptyBatch,
    /// A payload does not fit the fixed-width multi-send length field.
    #[error("payload of {len} bytes does not fit the multi-send length field")]
    PayloadTooLong {
        /// Length of the offending payload.
        len: usize,
    },
    /// A packed record was cut short.
    #[error("packed multi-send record truncated with {remaining} bytes remaining")]
    Truncated {
        /// Bytes left over when the record header or payload ran out.
        remaining: usize,
    },
    /// A packed record declares an unknown operation kind.
    #[error("unknown operation kind {0}")]
    UnknownOperation(u8),
    /// A packed record declares a payload length this platform cannot address.
    #[error("packed payload length {0} overflows this platform")]
    LengthOverflow(U256),
    /// An error occurred during ABI encoding/decoding.
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
}

/// A transport or node failure while reading chain state.
///
/// Always surfaced to the caller, never silently retried: a stale deployment
/// assumption would corrupt the signature computed downstream.
#[derive(Debug, Error)]
pub enum ChainQueryError {
    /// An error occurred talking to the node.
    #[error(transparent)]
    Transport(#[from] RpcError<TransportErrorKind>),
}

/// A signature the verifying contract cannot accept.
#[derive(Debug, Error)]
pub enum InvalidSignatureError {
    /// The recovery byte is outside every known legacy convention.
    #[error("signature recovery byte {0} is out of range")]
    RecoveryId(u8),
    /// The raw signature is not 65 bytes.
    #[error("signature must be 65 bytes, got {0}")]
    Length(usize),
    /// The signing adapter failed to produce a signature.
    #[error(transparent)]
    Signer(#[from] alloy::signers::Error),
}

/// An error surfaced verbatim from the relay service.
#[derive(Debug, Error)]
pub enum RelayError {
    /// An error occurred talking to the relay.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The configured relay endpoint cannot be joined with a route.
    #[error("invalid relay endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The relay rejected the request.
    #[error("relay rejected request with status {status}: {message}")]
    Api {
        /// HTTP status code returned by the relay.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },
}

/// The overarching error type returned by an orchestration call.
///
/// Every component fails fast and propagates the first error encountered;
/// nothing here swallows or downgrades an error from a lower layer, and no
/// component retries. Retries are the caller's responsibility: re-resolving
/// proxy state and re-signing are idempotent and safe to repeat.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The orchestration context is malformed.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    /// Batch encoding failed.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// A chain read failed.
    #[error(transparent)]
    ChainQuery(#[from] ChainQueryError),
    /// Signing failed or produced a signature outside every known
    /// convention.
    #[error(transparent)]
    Signature(#[from] InvalidSignatureError),
    /// The relay service returned an error.
    #[error(transparent)]
    Relay(#[from] RelayError),
}
