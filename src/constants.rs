//! Orchestration constants.

use alloy::primitives::{B256, b256};

/// Salt nonce used by the relay's deploy-and-execute path for deterministic
/// proxy deployment.
///
/// Equivalent to `keccak256("Contract Proxy Kit")`. The salt is a fixed
/// constant so that the same owner account always deploys to the same proxy
/// address, regardless of which call triggers the deployment.
pub const PREDETERMINED_SALT_NONCE: B256 =
    b256!("0xcfe33a586323e7325be6aa6ecd8b4600d232a9037e83c8ece69413b777dabe65");

/// Minimum length of a packed multi-send record: 1 byte operation, 20 bytes
/// target, 32 bytes value, 32 bytes payload length.
pub const MULTI_SEND_RECORD_HEADER: usize = 85;

#[cfg(test)]
mod tests {
    use super::PREDETERMINED_SALT_NONCE;
    use alloy::primitives::keccak256;

    #[test]
    fn salt_nonce_matches_label() {
        assert_eq!(keccak256(b"Contract Proxy Kit"), PREDETERMINED_SALT_NONCE);
    }
}
