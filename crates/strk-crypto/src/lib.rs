//! # strk-crypto
//!
//! Hash functions used for address derivation and entry-point selectors.
//!
//! - Pedersen pair hash and the Pedersen array hash (`compute_hash_on_elements`)
//! - Keccak-250 (`starknet_keccak`) and entry-point selectors

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;
mod selector;

pub use hash::{compute_hash_on_elements, pedersen};
pub use selector::{get_selector_from_name, keccak256, starknet_keccak};
