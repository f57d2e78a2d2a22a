//! Owner signing abstraction.
//!
//! The orchestration core only ever asks the controlling key for one thing:
//! a legacy `r || s || v` signature over a message. The capability is kept
//! object-safe so a session can hold any signer behind it.

use crate::error::InvalidSignatureError;
use alloy::{
    primitives::{Address, Bytes},
    signers::{Signer, local::PrivateKeySigner},
};
use async_trait::async_trait;
use std::{fmt, str::FromStr, sync::Arc};

/// A signing adapter for the proxy's controlling key.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// The owner account this signer controls.
    fn address(&self) -> Address;

    /// Signs `message` with the EIP-191 personal-sign scheme, returning the
    /// 65-byte `r || s || v` encoding with a legacy recovery byte.
    async fn sign_message(&self, message: &[u8]) -> Result<Bytes, InvalidSignatureError>;
}

/// Signer abstracted over any underlying key implementation.
#[derive(Clone)]
pub struct OwnerSigner(pub Arc<dyn Signer + Send + Sync>);

impl fmt::Debug for OwnerSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnerSigner").field(&self.address()).finish()
    }
}

impl OwnerSigner {
    /// Load a signer from a raw private key.
    pub fn from_signing_key(key: &str) -> eyre::Result<Self> {
        Ok(Self(Arc::new(PrivateKeySigner::from_str(key)?)))
    }

    /// Returns the signer's Ethereum address.
    pub fn address(&self) -> Address {
        self.0.address()
    }
}

#[async_trait]
impl MessageSigner for OwnerSigner {
    fn address(&self) -> Address {
        self.0.address()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Bytes, InvalidSignatureError> {
        let signature = self.0.sign_message(message).await?;

        // r || s || v with v in the {27,28} convention wallets emit.
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&signature.r().to_be_bytes::<32>());
        out.extend_from_slice(&signature.s().to_be_bytes::<32>());
        out.push(27 + signature.v() as u8);
        Ok(out.into())
    }
}
