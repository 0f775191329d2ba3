//! Keccak-based entry-point selectors

use sha3::{Digest, Keccak256};
use strk_primitives::Felt;

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 truncated to its low 250 bits so the result fits in a field element
pub fn starknet_keccak(data: &[u8]) -> Felt {
    let mut hash = keccak256(data);
    hash[0] &= 0x03;
    Felt::from_bytes_be(&hash)
}

/// Selector of an entry point, derived from its name
pub fn get_selector_from_name(name: &str) -> Felt {
    starknet_keccak(name.as_bytes())
}
