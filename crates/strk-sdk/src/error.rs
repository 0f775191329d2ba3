//! SDK error types

use std::time::Duration;

use strk_primitives::{felt_to_hex, Felt, FeltError};
use thiserror::Error;

/// ABI schema error. Always fatal, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The ABI declares no entry point with this name
    #[error("unknown entry point: {0}")]
    UnknownEntryPoint(String),

    /// The ABI declares no struct with this name
    #[error("unknown struct: {0}")]
    UnknownStruct(String),

    /// A struct refers back to itself through its members
    #[error("cyclic struct reference: {}", .0.join(" -> "))]
    CyclicStruct(Vec<String>),

    /// Unparseable type string
    #[error("invalid type `{ty}`: {reason}")]
    InvalidType {
        /// The offending type string
        ty: String,
        /// What went wrong
        reason: String,
    },

    /// Two entries share a name
    #[error("duplicate ABI entry: {0}")]
    Duplicate(String),

    /// The ABI document is not valid JSON of the expected shape
    #[error("malformed ABI: {0}")]
    Malformed(String),
}

/// Calldata encoding error. The caller's input is malformed; nothing is coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Value shape does not match the declared type
    #[error("type mismatch at `{path}`: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Location of the value inside the argument tree
        path: String,
        /// Expected shape
        expected: String,
        /// What was supplied
        actual: String,
    },

    /// Tuple or argument list of the wrong length
    #[error("arity mismatch at `{path}`: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Location of the value inside the argument tree
        path: String,
        /// Declared element count
        expected: usize,
        /// Supplied element count
        actual: usize,
    },

    /// A declared struct member has no value
    #[error("missing field `{field}` at `{path}`")]
    MissingField {
        /// Location of the struct inside the argument tree
        path: String,
        /// Member name
        field: String,
    },
}

/// Address derivation input error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// Class hash is not a field element
    #[error("invalid class hash: {0}")]
    InvalidClassHash(FeltError),

    /// Salt is not a field element
    #[error("invalid salt: {0}")]
    InvalidSalt(FeltError),
}

/// Status-derived transaction failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The ledger rejected the transaction
    #[error("transaction {} rejected: {reason}", felt_to_hex(.hash))]
    Rejected {
        /// Transaction hash
        hash: Felt,
        /// Ledger-reported reason
        reason: String,
    },

    /// The ledger has no record of the transaction
    #[error("transaction {} not received", felt_to_hex(.0))]
    NotReceived(Felt),

    /// The ledger reported a status outside the known set
    #[error("transaction {} failed with status {status}", felt_to_hex(.hash))]
    Failed {
        /// Transaction hash
        hash: Felt,
        /// Raw status as reported
        status: String,
    },

    /// No terminal status before the deadline
    #[error("timed out after {elapsed:?} waiting for transaction {}", felt_to_hex(.hash))]
    Timeout {
        /// Transaction hash
        hash: Felt,
        /// Configured deadline
        elapsed: Duration,
    },
}

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// ABI schema error
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Calldata encoding error
    #[error("encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// Address derivation error
    #[error("derivation error: {0}")]
    Derivation(#[from] DerivationError),

    /// Transaction outcome error
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Invalid field element
    #[error("invalid field element: {0}")]
    Felt(#[from] FeltError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid options
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Constructor calldata was supplied without an ABI to interpret it
    #[error("constructor calldata was provided without an abi")]
    CalldataWithoutAbi,

    /// The ABI declares constructor arguments but none were supplied
    #[error("contract has a constructor with arguments and no arguments were provided")]
    MissingConstructorArguments,

    /// Receipt carries no deployment event
    #[error("transaction {} emitted no deployment event", felt_to_hex(.0))]
    MissingDeploymentEvent(Felt),

    /// Deployed address differs from the prediction
    #[error("deployed address {} does not match predicted {}", felt_to_hex(.actual), felt_to_hex(.predicted))]
    AddressMismatch {
        /// Address computed client-side
        predicted: Felt,
        /// Address emitted by the ledger
        actual: Felt,
    },

    /// The wait was cancelled by the caller
    #[error("wait for transaction {} cancelled", felt_to_hex(.0))]
    Cancelled(Felt),
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}
