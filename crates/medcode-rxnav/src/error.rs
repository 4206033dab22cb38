//! Error types for RxNav lookups.

use medcode_types::{AtcLevelError, NdcParseError};
use thiserror::Error;

/// Errors that can occur while resolving drug codes through RxNav.
#[derive(Error, Debug)]
pub enum RxNavError {
    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// RxNav answered with a non-success status.
    #[error("RxNav returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The response body was not the expected JSON.
    #[error("Invalid RxNav response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The NDC failed validation.
    #[error(transparent)]
    InvalidNdc(#[from] NdcParseError),

    /// The ATC level is outside 1..=4.
    #[error(transparent)]
    InvalidLevel(#[from] AtcLevelError),

    /// No history entry of the NDC carries an active RxCUI.
    #[error("No active RxCUI for NDC {ndc}")]
    NoActiveRxcui {
        /// The NDC that was looked up.
        ndc: String,
    },
}

/// Result type for RxNav operations.
pub type RxNavResult<T> = Result<T, RxNavError>;
