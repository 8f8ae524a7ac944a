//! API Error Types
//!
//! Errors raised while talking to the Roasterz backend. The dashboard layer
//! collapses all of them into a single logged failure; they stay distinct
//! here so logs say what actually went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from a backend call
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connect, TLS, body read)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend answered 2xx with a body we could not decode
    #[error("Invalid JSON in response: {error} (body: {body:?})")]
    InvalidJson {
        body: String,
        error: serde_json::Error,
    },

    /// A call was attempted with no credential set
    #[error("No auth token set")]
    MissingCredential,

    /// The item image could not be read from disk
    #[error("Cannot read attachment {path:?}: {error}")]
    Attachment {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl ApiError {
    /// True when the backend rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;
