//! SDK types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strk_primitives::{BlockNumber, Felt, TxHash};

use crate::finality::{ExecutionStatus, TransactionOutcome, TransactionStatus};

/// A single contract call: target, entry point selector and flat calldata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Contract being called
    pub to: Felt,
    /// Entry point selector
    pub selector: Felt,
    /// Encoded arguments
    pub calldata: Vec<Felt>,
}

/// Reason attached to a rejected transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    /// Ledger error code
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub error_message: Option<String>,
}

impl FailureReason {
    /// Best available description
    pub fn describe(&self) -> String {
        match (&self.code, &self.error_message) {
            (Some(code), Some(msg)) => format!("{}: {}", code, msg),
            (Some(code), None) => code.clone(),
            (None, Some(msg)) => msg.clone(),
            (None, None) => "no reason given".to_string(),
        }
    }
}

/// Response of a transaction status query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionStatusResponse {
    /// Current status; unknown values are kept rather than rejected
    #[serde(rename = "tx_status", alias = "finality_status")]
    pub status: TransactionStatus,
    /// Block containing the transaction, once included
    #[serde(default)]
    pub block_hash: Option<Felt>,
    /// Block number, once included
    #[serde(default)]
    pub block_number: Option<BlockNumber>,
    /// Rejection details
    #[serde(default, rename = "tx_failure_reason")]
    pub failure_reason: Option<FailureReason>,
    /// Execution result, reported separately from finality
    #[serde(default)]
    pub execution_status: Option<ExecutionStatus>,
    /// Why execution reverted
    #[serde(default, alias = "failure_reason")]
    pub revert_reason: Option<String>,
}

/// Event emitted during execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Emitting contract
    pub from_address: Felt,
    /// Indexed keys
    #[serde(default)]
    pub keys: Vec<Felt>,
    /// Payload
    #[serde(default)]
    pub data: Vec<Felt>,
}

/// Transaction receipt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: TxHash,
    /// Status at the time of the query
    #[serde(alias = "finality_status")]
    pub status: TransactionStatus,
    /// Block containing the transaction
    #[serde(default)]
    pub block_hash: Option<Felt>,
    /// Block number
    #[serde(default)]
    pub block_number: Option<BlockNumber>,
    /// Fee actually charged
    #[serde(default)]
    pub actual_fee: Option<ActualFee>,
    /// Events in emission order
    #[serde(default)]
    pub events: Vec<Event>,
    /// Rejection details
    #[serde(default, rename = "tx_failure_reason")]
    pub failure_reason: Option<FailureReason>,
}

/// Fee charged for a transaction.
///
/// Older nodes report a bare amount, newer ones an amount with its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActualFee {
    /// Amount only
    Amount(Felt),
    /// Amount with the token it is paid in
    Payment {
        /// Amount charged
        amount: Felt,
        /// `WEI` or `FRI`
        unit: String,
    },
}

impl ActualFee {
    /// Amount charged
    pub fn amount(&self) -> Felt {
        match self {
            ActualFee::Amount(amount) | ActualFee::Payment { amount, .. } => *amount,
        }
    }

    /// Fee unit, when the node reports one
    pub fn unit(&self) -> Option<&str> {
        match self {
            ActualFee::Amount(_) => None,
            ActualFee::Payment { unit, .. } => Some(unit),
        }
    }
}

/// Signed invocation, as produced by an external signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvokePayload {
    /// Account sending the transaction
    pub sender_address: Felt,
    /// Account `__execute__` calldata
    pub calldata: Vec<Felt>,
    /// Fee ceiling
    pub max_fee: Felt,
    /// Signature over the transaction hash
    pub signature: Vec<Felt>,
    /// Account nonce
    pub nonce: Felt,
    /// Transaction version
    pub version: Felt,
}

/// Result of submitting a transaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmittedTransaction {
    /// Hash to poll
    pub transaction_hash: TxHash,
}

impl TransactionStatusResponse {
    /// Response carrying only a status
    pub fn new(status: TransactionStatus) -> Self {
        Self {
            status,
            block_hash: None,
            block_number: None,
            failure_reason: None,
            execution_status: None,
            revert_reason: None,
        }
    }

    /// Build from a raw JSON value
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Whether the transaction was included but its execution reverted
    pub fn is_reverted(&self) -> bool {
        self.execution_status == Some(ExecutionStatus::Reverted)
    }

    /// Ledger-reported reason for a revert or rejection
    pub fn rejection_reason(&self) -> Option<String> {
        self.revert_reason
            .clone()
            .or_else(|| self.failure_reason.as_ref().map(FailureReason::describe))
    }

    /// Three-way outcome, with the ledger's reason attached to rejections
    pub fn outcome(&self) -> TransactionOutcome {
        if self.is_reverted() || self.status == TransactionStatus::Rejected {
            return TransactionOutcome::Rejected(self.rejection_reason());
        }
        self.status.outcome()
    }
}
