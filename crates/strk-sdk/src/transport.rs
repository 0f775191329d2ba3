//! Transport layer for RPC communication

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::SdkError;

/// JSON-RPC error code for an unknown transaction hash
pub const TXN_HASH_NOT_FOUND: i64 = 29;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Canned reply of a [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Successful result
    Result(Value),
    /// JSON-RPC error object
    RpcError {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },
    /// Connection-level failure
    TransportError(String),
}

impl MockResponse {
    fn into_result(self) -> Result<Value, SdkError> {
        match self {
            MockResponse::Result(value) => Ok(value),
            MockResponse::RpcError { code, message } => Err(SdkError::Rpc { code, message }),
            MockResponse::TransportError(message) => Err(SdkError::Transport(message)),
        }
    }
}

impl From<Value> for MockResponse {
    fn from(value: Value) -> Self {
        MockResponse::Result(value)
    }
}

#[derive(Default)]
struct MockState {
    /// Replies consumed in order; the last one sticks
    queued: HashMap<String, VecDeque<MockResponse>>,
    requests: Vec<(String, Vec<Value>)>,
}

/// Mock transport for testing
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    default_responses: HashMap<String, Value>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert(
            "starknet_chainId".to_string(),
            Value::String("0x534e5f5345504f4c4941".to_string()), // SN_SEPOLIA
        );
        defaults.insert("starknet_blockNumber".to_string(), Value::from(256u64));

        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            default_responses: defaults,
        }
    }

    /// Replace every queued reply for `method` with `response`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, method: &str, response: impl Into<MockResponse>) {
        let mut state = self.state.lock().expect("MockTransport mutex poisoned");
        state
            .queued
            .insert(method.to_string(), VecDeque::from([response.into()]));
    }

    /// Append a reply for `method`
    ///
    /// Replies are returned in push order. Once only one remains it is
    /// returned for every further request.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_response(&self, method: &str, response: impl Into<MockResponse>) {
        let mut state = self.state.lock().expect("MockTransport mutex poisoned");
        state
            .queued
            .entry(method.to_string())
            .or_default()
            .push_back(response.into());
    }

    /// Clear custom responses
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn clear_responses(&self) {
        self.state
            .lock()
            .expect("MockTransport mutex poisoned")
            .queued
            .clear();
    }

    /// Every request seen so far, oldest first
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<(String, Vec<Value>)> {
        self.state
            .lock()
            .expect("MockTransport mutex poisoned")
            .requests
            .clone()
    }

    /// Number of requests made for `method`
    pub fn request_count(&self, method: &str) -> usize {
        self.requests().iter().filter(|(m, _)| m == method).count()
    }

    /// A second handle onto the same mock state
    pub fn handle(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            default_responses: self.default_responses.clone(),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let queued = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?;
            state.requests.push((method.to_string(), params));
            state.queued.get_mut(method).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };

        if let Some(response) = queued {
            return response.into_result();
        }

        if let Some(response) = self.default_responses.get(method) {
            return Ok(response.clone());
        }

        Err(SdkError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let id = self.next_id();
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::trace!(method, id, "sending rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or_else(|| SdkError::Rpc {
            code: -32603,
            message: "No result in response".to_string(),
        })
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();

        let result = transport
            .request_json("starknet_blockNumber", vec![])
            .await
            .unwrap();
        assert_eq!(result, json!(256));
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_response("starknet_chainId", json!("0x5"));

        let result = transport
            .request_json("starknet_chainId", vec![])
            .await
            .unwrap();
        assert_eq!(result, json!("0x5"));
    }

    #[tokio::test]
    async fn test_mock_transport_queue_last_sticks() {
        let transport = MockTransport::new();
        transport.push_response("m", json!(1));
        transport.push_response("m", json!(2));

        assert_eq!(transport.request_json("m", vec![]).await.unwrap(), json!(1));
        assert_eq!(transport.request_json("m", vec![]).await.unwrap(), json!(2));
        assert_eq!(transport.request_json("m", vec![]).await.unwrap(), json!(2));
        assert_eq!(transport.request_count("m"), 3);
    }

    #[tokio::test]
    async fn test_mock_transport_errors() {
        let transport = MockTransport::new();
        transport.set_response(
            "m",
            MockResponse::RpcError {
                code: TXN_HASH_NOT_FOUND,
                message: "Transaction hash not found".to_string(),
            },
        );
        let err = transport.request_json("m", vec![]).await.unwrap_err();
        assert!(matches!(err, SdkError::Rpc { code: 29, .. }));

        transport.set_response("m", MockResponse::TransportError("reset".to_string()));
        let err = transport.request_json("m", vec![]).await.unwrap_err();
        assert!(matches!(err, SdkError::Transport(_)));
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        let handle = transport.handle();
        let _ = transport
            .request_json("starknet_blockNumber", vec![json!("0x1")])
            .await;

        let requests = handle.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "starknet_blockNumber");
        assert_eq!(requests[0].1, vec![json!("0x1")]);
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        let result = transport.request_json("unknown_method", vec![]).await;
        assert!(matches!(result, Err(SdkError::Rpc { code: -32601, .. })));
    }
}
