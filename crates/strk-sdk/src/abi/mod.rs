//! Contract ABI: schema loading and calldata encoding
//!
//! This module provides functionality for:
//! - Loading a compiled contract's JSON ABI into an [`AbiSchema`]
//! - Resolving entry-point parameters and struct layouts into [`TypeDescriptor`]s
//! - Flattening [`CalldataValue`]s into field elements
//!
//! # Example
//!
//! ```rust
//! use strk_sdk::abi::{encode, encode_untyped, AbiSchema, CalldataValue};
//! use serde_json::json;
//!
//! let schema = AbiSchema::from_value(json!([
//!     {"type": "struct", "name": "Nested", "members": [{"name": "value", "type": "felt", "offset": 0}]},
//!     {"type": "struct", "name": "Top", "members": [
//!         {"name": "value", "type": "felt", "offset": 0},
//!         {"name": "nested_struct", "type": "Nested", "offset": 1}
//!     ]}
//! ])).unwrap();
//!
//! let ty = schema.resolve_struct("Top").unwrap();
//! let value = CalldataValue::try_from(&json!({"value": 12, "nested_struct": {"value": 99}})).unwrap();
//! let calldata = encode(&ty, &value).unwrap();
//! assert_eq!(calldata.len(), 2);
//!
//! let raw = encode_untyped(&CalldataValue::from(vec![1u64, 2, 3])).unwrap();
//! assert_eq!(raw.len(), 4);
//! ```

mod encode;
mod schema;
mod types;

pub use encode::{encode, encode_arguments, encode_calldata, encode_untyped};
pub use schema::{
    AbiEntry, AbiSchema, EventAbiEntry, FunctionAbiEntry, StructAbiEntry, StructMember,
    TypedParameter, CONSTRUCTOR_NAME,
};
pub use types::{CalldataValue, Parameter, TypeDescriptor};
