//! # strk-sdk
//!
//! Client-side layer that turns a contract invocation into a ledger-ready
//! transaction and tracks it to a final outcome.
//!
//! ## Features
//!
//! - **ABI**: JSON ABI loading and schema-driven calldata encoding
//! - **Deployer**: contract address prediction and universal-deployer calls
//! - **Finality**: typed polling of transaction status
//! - **LedgerClient**: JSON-RPC client over a pluggable [`Transport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strk_sdk::{DeployOptions, Deployer, LedgerClient, WaitOptions};
//! use strk_sdk::abi::CalldataValue;
//! use strk_primitives::Felt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Predict where a contract will land before deploying it
//!     let deployer = Deployer::new(None);
//!     let class_hash = Felt::from_hex_unchecked("0x1234");
//!     let (call, address) = deployer.create_deployment_call(
//!         class_hash,
//!         None,
//!         &DeployOptions::default().salt(1u64),
//!     )?;
//!     println!("deploying to {} via {:?}", address, call.to);
//!
//!     // Wait for a submitted transaction
//!     let client = LedgerClient::connect("http://localhost:5050/rpc");
//!     let hash = Felt::from_hex_unchecked("0xabc");
//!     let receipt = client.wait_for_finality(hash, &WaitOptions::default()).await?;
//!     println!("status: {}", receipt.status);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod client;
pub mod config;
pub mod deployer;
mod error;
pub mod finality;
mod transport;
pub mod types;

// Re-export main types
pub use client::{LedgerClient, Submitter};
pub use config::{ClientConfig, DeployOptions, WaitOptions};
pub use deployer::{
    compute_address, verify_deployment, AddressConstants, DeployResult, Deployer,
    DeploymentRequest, PredictedAddress,
};
pub use error::{DerivationError, EncodeError, SchemaError, SdkError, TransactionError};
pub use finality::{
    wait_for_finality, wait_for_finality_cancellable, ExecutionStatus, FinalityLevel,
    LedgerQuery, TransactionOutcome, TransactionStatus,
};
pub use transport::{MockResponse, MockTransport, TXN_HASH_NOT_FOUND};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

pub use tokio_util::sync::CancellationToken;

// Re-export primitives for convenience
pub use strk_primitives::{BigInt, Felt, TxHash};
