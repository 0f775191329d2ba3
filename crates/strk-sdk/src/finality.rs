//! Transaction finality tracking
//!
//! [`wait_for_finality`] polls the ledger until a transaction reaches the
//! requested acceptance level, then returns its receipt. Every other
//! terminal observation becomes a distinct [`TransactionError`]:
//!
//! | Ledger status        | Result                                   |
//! |----------------------|------------------------------------------|
//! | `RECEIVED`/`PENDING` | keep polling                             |
//! | `ACCEPTED_ON_L2`     | done, unless L1 finality was requested   |
//! | `ACCEPTED_ON_L1`     | done                                     |
//! | `REJECTED`           | [`TransactionError::Rejected`]           |
//! | execution `REVERTED` | [`TransactionError::Rejected`]           |
//! | `NOT_RECEIVED`       | [`TransactionError::NotReceived`]        |
//! | anything else        | [`TransactionError::Failed`]             |
//!
//! Transport errors are returned as they are; they never turn into a status.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use strk_primitives::{felt_to_hex, TxHash};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WaitOptions;
use crate::error::TransactionError;
use crate::types::{TransactionReceipt, TransactionStatusResponse};
use crate::SdkError;

/// Status of a transaction as reported by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Value")]
pub enum TransactionStatus {
    /// The ledger has no record of the hash
    NotReceived,
    /// Submitted, not yet processed
    Received,
    /// Executed in a pending block
    Pending,
    /// Included in an accepted L2 block
    AcceptedOnL2,
    /// Proven on L1
    AcceptedOnL1,
    /// Rejected by the ledger
    Rejected,
    /// A status outside the known set, kept verbatim
    Unrecognized(String),
}

impl TransactionStatus {
    /// Parse a raw status string; unknown values become [`TransactionStatus::Unrecognized`]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "NOT_RECEIVED" => TransactionStatus::NotReceived,
            "RECEIVED" => TransactionStatus::Received,
            "PENDING" => TransactionStatus::Pending,
            "ACCEPTED_ON_L2" => TransactionStatus::AcceptedOnL2,
            "ACCEPTED_ON_L1" => TransactionStatus::AcceptedOnL1,
            "REJECTED" => TransactionStatus::Rejected,
            other => TransactionStatus::Unrecognized(other.to_string()),
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::NotReceived => "NOT_RECEIVED",
            TransactionStatus::Received => "RECEIVED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::AcceptedOnL2 => "ACCEPTED_ON_L2",
            TransactionStatus::AcceptedOnL1 => "ACCEPTED_ON_L1",
            TransactionStatus::Rejected => "REJECTED",
            TransactionStatus::Unrecognized(raw) => raw,
        }
    }

    /// Whether this status meets `level`
    pub fn satisfies(&self, level: FinalityLevel) -> bool {
        match level {
            FinalityLevel::AcceptedOnL2 => matches!(
                self,
                TransactionStatus::AcceptedOnL2 | TransactionStatus::AcceptedOnL1
            ),
            FinalityLevel::AcceptedOnL1 => matches!(self, TransactionStatus::AcceptedOnL1),
        }
    }

    /// Collapse into the three-way outcome
    pub fn outcome(&self) -> TransactionOutcome {
        match self {
            TransactionStatus::AcceptedOnL2 | TransactionStatus::AcceptedOnL1 => {
                TransactionOutcome::Accepted
            }
            TransactionStatus::Rejected => TransactionOutcome::Rejected(None),
            _ => TransactionOutcome::Unknown,
        }
    }
}

impl From<Value> for TransactionStatus {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => TransactionStatus::parse(&s),
            other => TransactionStatus::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution result of an included transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Value")]
pub enum ExecutionStatus {
    /// Executed successfully
    Succeeded,
    /// Included, but execution reverted
    Reverted,
    /// A value outside the known set, kept verbatim
    Unrecognized(String),
}

impl From<Value> for ExecutionStatus {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) if s == "SUCCEEDED" => ExecutionStatus::Succeeded,
            Value::String(s) if s == "REVERTED" => ExecutionStatus::Reverted,
            Value::String(s) => ExecutionStatus::Unrecognized(s),
            other => ExecutionStatus::Unrecognized(other.to_string()),
        }
    }
}

/// Minimum status at which a transaction counts as final
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FinalityLevel {
    /// Accepted in an L2 block
    #[default]
    AcceptedOnL2,
    /// Proven on L1
    AcceptedOnL1,
}

/// Three-way summary of a transaction's fate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Accepted at L2 or stronger
    Accepted,
    /// Rejected, with the ledger's reason when known
    Rejected(Option<String>),
    /// Not (yet) resolved
    Unknown,
}

/// Read-only ledger queries used by the finality tracker
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Current status of a transaction
    async fn get_transaction_status(
        &self,
        hash: TxHash,
    ) -> Result<TransactionStatusResponse, SdkError>;

    /// Receipt of a transaction
    async fn get_transaction_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, SdkError>;
}

/// Poll until `hash` is final, then return its receipt
pub async fn wait_for_finality<Q>(
    ledger: &Q,
    hash: TxHash,
    options: &WaitOptions,
) -> Result<TransactionReceipt, SdkError>
where
    Q: LedgerQuery + ?Sized,
{
    options.validate()?;

    match options.timeout {
        Some(limit) => tokio::time::timeout(limit, poll_until_final(ledger, hash, options))
            .await
            .unwrap_or_else(|_| {
                warn!(hash = %felt_to_hex(&hash), ?limit, "gave up waiting for transaction");
                Err(TransactionError::Timeout {
                    hash,
                    elapsed: limit,
                }
                .into())
            }),
        None => poll_until_final(ledger, hash, options).await,
    }
}

/// [`wait_for_finality`] that also stops when `cancel` fires
pub async fn wait_for_finality_cancellable<Q>(
    ledger: &Q,
    hash: TxHash,
    options: &WaitOptions,
    cancel: CancellationToken,
) -> Result<TransactionReceipt, SdkError>
where
    Q: LedgerQuery + ?Sized,
{
    tokio::select! {
        result = wait_for_finality(ledger, hash, options) => result,
        _ = cancel.cancelled() => {
            debug!(hash = %felt_to_hex(&hash), "wait cancelled");
            Err(SdkError::Cancelled(hash))
        }
    }
}

async fn poll_until_final<Q>(
    ledger: &Q,
    hash: TxHash,
    options: &WaitOptions,
) -> Result<TransactionReceipt, SdkError>
where
    Q: LedgerQuery + ?Sized,
{
    let hash_hex = felt_to_hex(&hash);
    let mut not_received = 0u32;
    let mut attempt = 0u64;

    loop {
        attempt += 1;
        let response = ledger.get_transaction_status(hash).await?;
        debug!(hash = %hash_hex, status = %response.status, attempt, "polled transaction status");

        if response.is_reverted() {
            let reason = response
                .rejection_reason()
                .unwrap_or_else(|| "execution reverted".to_string());
            warn!(hash = %hash_hex, %reason, "transaction reverted");
            return Err(TransactionError::Rejected { hash, reason }.into());
        }

        match &response.status {
            status if status.satisfies(options.min_status) => {
                info!(hash = %hash_hex, %status, block = ?response.block_number, "transaction accepted");
                return ledger.get_transaction_receipt(hash).await;
            }
            TransactionStatus::Rejected => {
                let reason = response
                    .rejection_reason()
                    .unwrap_or_else(|| "no reason given".to_string());
                warn!(hash = %hash_hex, %reason, "transaction rejected");
                return Err(TransactionError::Rejected { hash, reason }.into());
            }
            TransactionStatus::NotReceived => {
                if not_received >= options.not_received_retries {
                    warn!(hash = %hash_hex, attempt, "transaction not received");
                    return Err(TransactionError::NotReceived(hash).into());
                }
                not_received += 1;
            }
            TransactionStatus::Unrecognized(raw) => {
                warn!(hash = %hash_hex, status = %raw, "unrecognized transaction status");
                return Err(TransactionError::Failed {
                    hash,
                    status: raw.clone(),
                }
                .into());
            }
            TransactionStatus::Received
            | TransactionStatus::Pending
            | TransactionStatus::AcceptedOnL2
            | TransactionStatus::AcceptedOnL1 => {
                not_received = 0;
            }
        }

        tokio::time::sleep(options.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use strk_primitives::Felt;

    /// Replays a fixed list of statuses; the last one repeats forever
    struct ScriptedLedger {
        statuses: Mutex<VecDeque<TransactionStatus>>,
        polls: AtomicUsize,
    }

    impl ScriptedLedger {
        fn new(statuses: Vec<TransactionStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                polls: AtomicUsize::new(0),
            }
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LedgerQuery for ScriptedLedger {
        async fn get_transaction_status(
            &self,
            _hash: TxHash,
        ) -> Result<TransactionStatusResponse, SdkError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.pop_front().unwrap()
            } else {
                statuses.front().cloned().unwrap()
            };
            Ok(TransactionStatusResponse {
                block_number: Some(1),
                ..TransactionStatusResponse::new(status)
            })
        }

        async fn get_transaction_receipt(
            &self,
            hash: TxHash,
        ) -> Result<TransactionReceipt, SdkError> {
            Ok(TransactionReceipt {
                transaction_hash: hash,
                status: TransactionStatus::AcceptedOnL2,
                block_hash: None,
                block_number: Some(1),
                actual_fee: None,
                events: vec![],
                failure_reason: None,
            })
        }
    }

    /// Ledger whose queries always fail at the transport level
    struct BrokenLedger;

    #[async_trait]
    impl LedgerQuery for BrokenLedger {
        async fn get_transaction_status(
            &self,
            _hash: TxHash,
        ) -> Result<TransactionStatusResponse, SdkError> {
            Err(SdkError::Transport("connection refused".to_string()))
        }

        async fn get_transaction_receipt(
            &self,
            _hash: TxHash,
        ) -> Result<TransactionReceipt, SdkError> {
            Err(SdkError::Transport("connection refused".to_string()))
        }
    }

    fn fast() -> WaitOptions {
        WaitOptions::default().poll_interval(Duration::from_millis(1))
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TransactionStatus::parse("PENDING"), TransactionStatus::Pending);
        assert_eq!(
            TransactionStatus::parse("SOMETHING_NEW"),
            TransactionStatus::Unrecognized("SOMETHING_NEW".to_string())
        );
        assert_eq!(TransactionStatus::AcceptedOnL1.to_string(), "ACCEPTED_ON_L1");
    }

    #[test]
    fn test_status_outcome() {
        assert_eq!(TransactionStatus::AcceptedOnL2.outcome(), TransactionOutcome::Accepted);
        assert_eq!(TransactionStatus::Rejected.outcome(), TransactionOutcome::Rejected(None));
        assert_eq!(TransactionStatus::NotReceived.outcome(), TransactionOutcome::Unknown);
        assert_eq!(TransactionStatus::Received.outcome(), TransactionOutcome::Unknown);
    }

    #[test]
    fn test_status_satisfies() {
        assert!(TransactionStatus::AcceptedOnL2.satisfies(FinalityLevel::AcceptedOnL2));
        assert!(TransactionStatus::AcceptedOnL1.satisfies(FinalityLevel::AcceptedOnL2));
        assert!(!TransactionStatus::AcceptedOnL2.satisfies(FinalityLevel::AcceptedOnL1));
        assert!(!TransactionStatus::Pending.satisfies(FinalityLevel::AcceptedOnL2));
    }

    #[tokio::test]
    async fn test_wait_accepted_after_progress() {
        let ledger = ScriptedLedger::new(vec![
            TransactionStatus::Received,
            TransactionStatus::Pending,
            TransactionStatus::AcceptedOnL2,
        ]);
        let receipt = wait_for_finality(&ledger, Felt::ONE, &fast()).await.unwrap();
        assert_eq!(receipt.transaction_hash, Felt::ONE);
        assert_eq!(ledger.polls(), 3);
    }

    #[tokio::test]
    async fn test_wait_strict_finality_keeps_polling_past_l2() {
        let ledger = ScriptedLedger::new(vec![
            TransactionStatus::AcceptedOnL2,
            TransactionStatus::AcceptedOnL2,
            TransactionStatus::AcceptedOnL1,
        ]);
        let options = fast().min_status(FinalityLevel::AcceptedOnL1);
        wait_for_finality(&ledger, Felt::ONE, &options).await.unwrap();
        assert_eq!(ledger.polls(), 3);
    }

    #[tokio::test]
    async fn test_wait_rejected() {
        let ledger = ScriptedLedger::new(vec![TransactionStatus::Rejected]);
        let err = wait_for_finality(&ledger, Felt::ONE, &fast()).await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::Transaction(TransactionError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_wait_not_received_is_fatal_by_default() {
        let ledger = ScriptedLedger::new(vec![TransactionStatus::NotReceived]);
        let err = wait_for_finality(&ledger, Felt::ONE, &fast()).await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::Transaction(TransactionError::NotReceived(_))
        ));
        assert_eq!(ledger.polls(), 1);
    }

    #[tokio::test]
    async fn test_wait_not_received_retries() {
        let ledger = ScriptedLedger::new(vec![
            TransactionStatus::NotReceived,
            TransactionStatus::NotReceived,
            TransactionStatus::AcceptedOnL2,
        ]);
        let options = fast().not_received_retries(2);
        wait_for_finality(&ledger, Felt::ONE, &options).await.unwrap();
        assert_eq!(ledger.polls(), 3);
    }

    #[tokio::test]
    async fn test_wait_unrecognized_status_fails() {
        let ledger = ScriptedLedger::new(vec![TransactionStatus::Unrecognized("-100".to_string())]);
        let err = wait_for_finality(&ledger, Felt::ONE, &fast()).await.unwrap_err();
        match err {
            SdkError::Transaction(TransactionError::Failed { status, .. }) => {
                assert_eq!(status, "-100")
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_timeout() {
        let ledger = ScriptedLedger::new(vec![TransactionStatus::Received]);
        let options = WaitOptions::default()
            .poll_interval(Duration::from_secs(1))
            .timeout(Duration::from_secs(10));
        let err = wait_for_finality(&ledger, Felt::ONE, &options).await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::Transaction(TransactionError::Timeout { .. })
        ));
        assert!(ledger.polls() >= 10);
    }

    #[tokio::test]
    async fn test_wait_propagates_transport_errors() {
        let err = wait_for_finality(&BrokenLedger, Felt::ONE, &fast()).await.unwrap_err();
        assert!(matches!(err, SdkError::Transport(_)));
    }

    #[tokio::test]
    async fn test_wait_rejects_zero_interval() {
        let ledger = ScriptedLedger::new(vec![TransactionStatus::AcceptedOnL2]);
        let options = WaitOptions::default().poll_interval(Duration::ZERO);
        let err = wait_for_finality(&ledger, Felt::ONE, &options).await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidConfig(_)));
        assert_eq!(ledger.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_cancelled() {
        let ledger = ScriptedLedger::new(vec![TransactionStatus::Received]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            trigger.cancel();
        });

        let options = WaitOptions::default().poll_interval(Duration::from_secs(1));
        let err = wait_for_finality_cancellable(&ledger, Felt::ONE, &options, cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Cancelled(_)));
    }

    #[tokio::test]
    async fn test_many_waits_run_concurrently() {
        let mut handles = Vec::new();
        for i in 0..50u64 {
            let ledger = std::sync::Arc::new(ScriptedLedger::new(vec![
                TransactionStatus::Received,
                TransactionStatus::AcceptedOnL2,
            ]));
            let options = fast();
            handles.push(tokio::spawn(async move {
                wait_for_finality(ledger.as_ref(), Felt::from(i), &options).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }

    #[test]
    fn test_execution_status_from_value() {
        use serde_json::json;
        assert_eq!(ExecutionStatus::from(json!("REVERTED")), ExecutionStatus::Reverted);
        assert_eq!(ExecutionStatus::from(json!("SUCCEEDED")), ExecutionStatus::Succeeded);
        assert_eq!(
            ExecutionStatus::from(json!(3)),
            ExecutionStatus::Unrecognized("3".to_string())
        );
    }
}
