//! # Error Types
//!
//! Errors raised by the foundational types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations, and carry the
//! offending value so callers can render a precise message.

use thiserror::Error;

/// Top-level error type for `apportion-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A utility type string outside the closed set.
    #[error("unknown utility type: {0:?}")]
    UnknownUtilityType(String),

    /// A billing period with an out-of-range year or month.
    #[error("invalid billing period: {0}")]
    InvalidPeriod(String),

    /// A percentage outside [0, 100].
    #[error("percentage {value} is outside [0, 100]")]
    PercentageOutOfRange {
        /// The rejected value, rendered as a decimal string.
        value: String,
    },

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// RFC 8785 canonical encoding failed.
    #[error("canonical encoding failed: {0}")]
    EncodingFailed(String),
}
