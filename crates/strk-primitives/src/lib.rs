//! # strk-primitives
//!
//! Primitive types for the strk client stack.
//!
//! Every value the ledger understands is a field element: an unsigned integer
//! taken modulo the STARK prime `2^251 + 17 * 2^192 + 1`. This crate re-exports
//! [`Felt`] and adds the range-checked conversions the rest of the workspace
//! relies on.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod felt;

pub use error::FeltError;
pub use felt::{
    felt_from_bigint, felt_from_biguint, felt_from_short_string, felt_to_biguint, felt_to_hex,
    field_modulus, parse_felt, parse_felt_dec, parse_felt_hex,
};

pub use num_bigint::{BigInt, BigUint, Sign};
pub use starknet_types_core::felt::{Felt, NonZeroFelt};

/// Transaction hash type
pub type TxHash = Felt;

/// Block number type
pub type BlockNumber = u64;
