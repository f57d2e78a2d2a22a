//! Owner signature with contract-convention recovery byte.

use crate::error::InvalidSignatureError;
use alloy::primitives::Bytes;

/// Length of an encoded signature: two 256-bit components and one recovery
/// byte.
const SIGNATURE_LEN: usize = 65;

/// A signature over a proxy transaction hash, with the recovery byte shifted
/// into the convention the verifying contract expects.
///
/// Wallet signers emit the recovery byte in one of two legacy conventions,
/// {0,1} or {27,28}; the proxy contract verifies against {31,32}. The
/// shift is applied exactly once, in [`OwnerSignature::from_legacy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerSignature(Bytes);

impl OwnerSignature {
    /// Normalizes a raw 65-byte `r || s || v` signature.
    ///
    /// Raw recovery bytes 0 and 1 are shifted by 31; 27 and 28 are shifted
    /// by 4. Any other value means the signing adapter is using a convention
    /// this core does not know, an unrecoverable fault surfaced as
    /// [`InvalidSignatureError::RecoveryId`].
    pub fn from_legacy(raw: &[u8]) -> Result<Self, InvalidSignatureError> {
        if raw.len() != SIGNATURE_LEN {
            return Err(InvalidSignatureError::Length(raw.len()));
        }

        let v = match raw[SIGNATURE_LEN - 1] {
            v @ (0 | 1) => v + 31,
            v @ (27 | 28) => v + 4,
            v => return Err(InvalidSignatureError::RecoveryId(v)),
        };

        let mut out = raw.to_vec();
        out[SIGNATURE_LEN - 1] = v;
        Ok(Self(out.into()))
    }

    /// The normalized recovery byte, 31 or 32.
    pub fn recovery_byte(&self) -> u8 {
        self.0[SIGNATURE_LEN - 1]
    }

    /// The encoded signature bytes.
    pub fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }
}

impl AsRef<[u8]> for OwnerSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
