//! CLI error types

use strk_primitives::FeltError;
use strk_sdk::SdkError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid field element
    #[error("Invalid field element `{input}`: {source}")]
    InvalidFelt {
        /// What the user typed
        input: String,
        /// Why it was rejected
        source: FeltError,
    },

    /// SDK error
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}
