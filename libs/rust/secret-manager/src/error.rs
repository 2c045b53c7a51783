//! Secret Manager error types using thiserror 2.0.
//!
//! Remote failures keep the service's status and message in their text;
//! only the variant is chosen locally.

use rust_common::{ApiError, ApiStatus};
use thiserror::Error;

/// Secret Manager client errors.
#[derive(Error, Debug)]
pub enum SecretManagerError {
    /// Client construction failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Secret or version not found
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated or lacks permission
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Secret creation raced with another creator
    #[error("Secret already exists: {0}")]
    AlreadyExists(String),

    /// Request rejected as malformed by the service
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Network failure or service fault
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call context was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// The call context deadline passed
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Result type for Secret Manager operations.
pub type SecretManagerResult<T> = Result<T, SecretManagerError>;

impl SecretManagerError {
    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::DeadlineExceeded)
    }

    /// Check if the secret (or its latest version) does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<ApiError> for SecretManagerError {
    fn from(err: ApiError) -> Self {
        match err.status {
            ApiStatus::NotFound => Self::NotFound(err.to_string()),
            ApiStatus::PermissionDenied | ApiStatus::Unauthenticated => {
                Self::AccessDenied(err.to_string())
            }
            ApiStatus::AlreadyExists => Self::AlreadyExists(err.to_string()),
            ApiStatus::InvalidArgument
            | ApiStatus::FailedPrecondition
            | ApiStatus::OutOfRange => Self::Validation(err.to_string()),
            // Service-side cancellation and timeouts are not the caller's
            // context ending; they keep the service's status and message.
            _ => Self::Transport(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for SecretManagerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
