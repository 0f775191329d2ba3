//! LedgerClient - JSON-RPC client for the ledger node

use async_trait::async_trait;
use serde_json::Value;
use strk_primitives::{felt_to_hex, Felt, TxHash};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::WaitOptions;
use crate::finality::{self, LedgerQuery, TransactionStatus};
use crate::transport::{deserialize_response, MockTransport, Transport, TXN_HASH_NOT_FOUND};
use crate::types::{
    Call, InvokePayload, SubmittedTransaction, TransactionReceipt, TransactionStatusResponse,
};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Signs and submits calls on behalf of an account
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Submit `calls` as one transaction and return its hash
    async fn submit(&self, calls: Vec<Call>, max_fee: Option<Felt>) -> Result<TxHash, SdkError>;
}

/// Ledger client for RPC communication
pub struct LedgerClient {
    transport: Box<dyn Transport>,
}

impl LedgerClient {
    /// Create a new client with HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> Self {
        Self {
            transport: Box::new(HttpTransport::new(url)),
        }
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self {
            transport: Box::new(MockTransport::new()),
        }
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Helper method to make RPC request and deserialize
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    // ==================== Chain Info ====================

    /// Get the chain ID
    pub async fn chain_id(&self) -> Result<Felt, SdkError> {
        self.request("starknet_chainId", vec![]).await
    }

    /// Get the latest block number
    pub async fn block_number(&self) -> Result<u64, SdkError> {
        self.request("starknet_blockNumber", vec![]).await
    }

    // ==================== Transaction Queries ====================

    /// Get the status of a transaction.
    ///
    /// An unknown hash is reported as `NOT_RECEIVED`; every other RPC or
    /// transport error is returned unchanged.
    pub async fn get_transaction_status(
        &self,
        hash: TxHash,
    ) -> Result<TransactionStatusResponse, SdkError> {
        let result: Result<TransactionStatusResponse, SdkError> = self
            .request(
                "starknet_getTransactionStatus",
                vec![serde_json::to_value(hash)?],
            )
            .await;

        match result {
            Err(SdkError::Rpc { code, .. }) if code == TXN_HASH_NOT_FOUND => {
                debug!(hash = %felt_to_hex(&hash), "transaction hash not found");
                Ok(TransactionStatusResponse::new(TransactionStatus::NotReceived))
            }
            other => other,
        }
    }

    /// Get a transaction receipt
    pub async fn get_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<TransactionReceipt, SdkError> {
        self.request(
            "starknet_getTransactionReceipt",
            vec![serde_json::to_value(hash)?],
        )
        .await
    }

    // ==================== Transaction Submission ====================

    /// Submit a signed invocation
    pub async fn add_invoke_transaction(&self, payload: &InvokePayload) -> Result<TxHash, SdkError> {
        let mut tx = serde_json::to_value(payload)?;
        if let Value::Object(map) = &mut tx {
            map.insert("type".to_string(), Value::String("INVOKE".to_string()));
        }
        let result: SubmittedTransaction = self
            .request("starknet_addInvokeTransaction", vec![tx])
            .await?;
        debug!(hash = %felt_to_hex(&result.transaction_hash), "submitted invoke transaction");
        Ok(result.transaction_hash)
    }

    // ==================== Finality ====================

    /// Poll until the transaction is final and return its receipt
    pub async fn wait_for_finality(
        &self,
        hash: TxHash,
        options: &WaitOptions,
    ) -> Result<TransactionReceipt, SdkError> {
        finality::wait_for_finality(self, hash, options).await
    }

    /// [`Self::wait_for_finality`] that stops when `cancel` fires
    pub async fn wait_for_finality_cancellable(
        &self,
        hash: TxHash,
        options: &WaitOptions,
        cancel: CancellationToken,
    ) -> Result<TransactionReceipt, SdkError> {
        finality::wait_for_finality_cancellable(self, hash, options, cancel).await
    }
}

#[async_trait]
impl LedgerQuery for LedgerClient {
    async fn get_transaction_status(
        &self,
        hash: TxHash,
    ) -> Result<TransactionStatusResponse, SdkError> {
        LedgerClient::get_transaction_status(self, hash).await
    }

    async fn get_transaction_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, SdkError> {
        LedgerClient::get_transaction_receipt(self, hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockResponse;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_client_chain_info() {
        let client = LedgerClient::new_mock();
        assert_eq!(client.block_number().await.unwrap(), 256);
        assert_eq!(
            client.chain_id().await.unwrap(),
            Felt::from_hex_unchecked("0x534e5f5345504f4c4941")
        );
    }

    #[tokio::test]
    async fn test_status_hash_not_found_is_not_received() {
        let transport = MockTransport::new();
        transport.set_response(
            "starknet_getTransactionStatus",
            MockResponse::RpcError {
                code: TXN_HASH_NOT_FOUND,
                message: "Transaction hash not found".to_string(),
            },
        );
        let client = LedgerClient::with_transport(transport);

        let status = client.get_transaction_status(Felt::ONE).await.unwrap();
        assert_eq!(status.status, TransactionStatus::NotReceived);
    }

    #[tokio::test]
    async fn test_status_other_rpc_errors_propagate() {
        let transport = MockTransport::new();
        transport.set_response(
            "starknet_getTransactionStatus",
            MockResponse::RpcError {
                code: -32603,
                message: "internal".to_string(),
            },
        );
        let client = LedgerClient::with_transport(transport);

        let err = client.get_transaction_status(Felt::ONE).await.unwrap_err();
        assert!(matches!(err, SdkError::Rpc { code: -32603, .. }));
    }

    #[tokio::test]
    async fn test_status_request_params() {
        let transport = MockTransport::new();
        let handle = transport.handle();
        transport.set_response(
            "starknet_getTransactionStatus",
            json!({"finality_status": "ACCEPTED_ON_L1"}),
        );
        let client = LedgerClient::with_transport(transport);

        let status = client
            .get_transaction_status(Felt::from(0xabcu64))
            .await
            .unwrap();
        assert_eq!(status.status, TransactionStatus::AcceptedOnL1);
        assert_eq!(handle.requests()[0].1, vec![json!("0xabc")]);
    }

    #[tokio::test]
    async fn test_add_invoke_transaction() {
        let transport = MockTransport::new();
        let handle = transport.handle();
        transport.set_response(
            "starknet_addInvokeTransaction",
            json!({"transaction_hash": "0x77"}),
        );
        let client = LedgerClient::with_transport(transport);

        let payload = InvokePayload {
            sender_address: Felt::from(1u64),
            calldata: vec![Felt::from(2u64)],
            max_fee: Felt::from(3u64),
            signature: vec![],
            nonce: Felt::ZERO,
            version: Felt::ONE,
        };
        let hash = client.add_invoke_transaction(&payload).await.unwrap();
        assert_eq!(hash, Felt::from(0x77u64));

        let (method, params) = handle.requests().remove(0);
        assert_eq!(method, "starknet_addInvokeTransaction");
        assert_eq!(params[0]["type"], json!("INVOKE"));
        assert_eq!(params[0]["sender_address"], json!("0x1"));
    }

    #[tokio::test]
    async fn test_malformed_receipt_is_serialization_error() {
        let transport = MockTransport::new();
        transport.set_response("starknet_getTransactionReceipt", json!({"nope": true}));
        let client = LedgerClient::with_transport(transport);

        let err = client.get_transaction_receipt(Felt::ONE).await.unwrap_err();
        assert!(matches!(err, SdkError::Serialization(_)));
    }
}
