use alloy_primitives::B256;
use sha2::{Digest, Sha256};

/// Keccak-256, as used by the EVM for packed commitments and EIP-191.
#[inline]
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    alloy_primitives::keccak256(data)
}

/// SHA-256, as used for ABI-encoded disperse batches.
#[inline]
pub fn sha256(data: impl AsRef<[u8]>) -> B256 {
    B256::from_slice(&Sha256::digest(data))
}
