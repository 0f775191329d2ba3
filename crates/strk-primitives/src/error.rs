//! Field element conversion errors

use thiserror::Error;

/// Error converting a value into a field element
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeltError {
    /// Malformed hexadecimal string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Malformed decimal string
    #[error("invalid decimal string: {0}")]
    InvalidDecimal(String),

    /// Field elements are unsigned
    #[error("negative value {0} is not a field element")]
    Negative(String),

    /// Value is not below the field modulus
    #[error("value {0} is out of field range")]
    OutOfRange(String),

    /// Short strings hold at most 31 ASCII characters
    #[error("short string too long: {0} characters (max 31)")]
    ShortStringTooLong(usize),

    /// Short strings must be ASCII
    #[error("short string contains non-ASCII characters")]
    NonAscii,
}
