//! Canonical Google API error classification.
//!
//! Google REST APIs answer failures with an error envelope of the form
//! `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`.
//! This module parses that envelope into an [`ApiError`] carrying a
//! canonical [`ApiStatus`], falling back to the HTTP status code when the
//! body is missing or not JSON.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Longest raw body fragment kept when the error envelope cannot be parsed.
const MAX_RAW_MESSAGE: usize = 512;

/// Canonical status codes shared by Google APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiStatus {
    /// The operation was cancelled by the caller.
    Cancelled,
    /// Unknown error.
    Unknown,
    /// The request was malformed.
    InvalidArgument,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded,
    /// The requested resource does not exist.
    NotFound,
    /// The resource the caller tried to create already exists.
    AlreadyExists,
    /// The caller lacks permission for the operation.
    PermissionDenied,
    /// Quota or rate limit exhausted.
    ResourceExhausted,
    /// The system is not in a state required for the operation.
    FailedPrecondition,
    /// The operation was aborted, typically due to a concurrency issue.
    Aborted,
    /// The operation was attempted past the valid range.
    OutOfRange,
    /// The operation is not implemented by the service.
    Unimplemented,
    /// Internal service error.
    Internal,
    /// The service is currently unavailable.
    Unavailable,
    /// Unrecoverable data loss or corruption.
    DataLoss,
    /// The request lacks valid authentication credentials.
    Unauthenticated,
}

impl ApiStatus {
    /// Parse the `status` field of an error envelope, e.g. `"NOT_FOUND"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let status = match name {
            "CANCELLED" => Self::Cancelled,
            "UNKNOWN" => Self::Unknown,
            "INVALID_ARGUMENT" => Self::InvalidArgument,
            "DEADLINE_EXCEEDED" => Self::DeadlineExceeded,
            "NOT_FOUND" => Self::NotFound,
            "ALREADY_EXISTS" => Self::AlreadyExists,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted,
            "FAILED_PRECONDITION" => Self::FailedPrecondition,
            "ABORTED" => Self::Aborted,
            "OUT_OF_RANGE" => Self::OutOfRange,
            "UNIMPLEMENTED" => Self::Unimplemented,
            "INTERNAL" => Self::Internal,
            "UNAVAILABLE" => Self::Unavailable,
            "DATA_LOSS" => Self::DataLoss,
            "UNAUTHENTICATED" => Self::Unauthenticated,
            _ => return None,
        };
        Some(status)
    }

    /// Map an HTTP status code onto the closest canonical status.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::ApiStatus;
    ///
    /// assert_eq!(ApiStatus::from_http(404), ApiStatus::NotFound);
    /// assert_eq!(ApiStatus::from_http(503), ApiStatus::Unavailable);
    /// ```
    #[must_use]
    pub const fn from_http(code: u16) -> Self {
        match code {
            400 => Self::InvalidArgument,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::AlreadyExists,
            412 => Self::FailedPrecondition,
            416 => Self::OutOfRange,
            429 => Self::ResourceExhausted,
            499 => Self::Cancelled,
            501 => Self::Unimplemented,
            503 => Self::Unavailable,
            504 => Self::DeadlineExceeded,
            500..=599 => Self::Internal,
            _ => Self::Unknown,
        }
    }

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Aborted => "ABORTED",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataLoss => "DATA_LOSS",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Check if a call failing with this status may succeed when repeated.
    ///
    /// Retry policy itself is left to callers.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Unavailable | Self::ResourceExhausted | Self::Aborted | Self::DeadlineExceeded
        )
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error answered by a Google API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status} (HTTP {http_status}): {message}")]
pub struct ApiError {
    /// Canonical status of the failure
    pub status: ApiStatus,
    /// HTTP status code of the response
    pub http_status: u16,
    /// Message reported by the service
    pub message: String,
}

#[derive(Deserialize)]
struct Envelope {
    error: EnvelopeBody,
}

#[derive(Deserialize)]
struct EnvelopeBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success response.
    ///
    /// The envelope's `status` wins over the HTTP code when both are present.
    #[must_use]
    pub fn from_response(http_status: u16, body: &[u8]) -> Self {
        if let Ok(envelope) = serde_json::from_slice::<Envelope>(body) {
            let status = envelope
                .error
                .status
                .as_deref()
                .and_then(ApiStatus::from_name)
                .unwrap_or_else(|| ApiStatus::from_http(http_status));
            return Self {
                status,
                http_status,
                message: envelope.error.message,
            };
        }

        let raw = String::from_utf8_lossy(body);
        let message = raw.trim().chars().take(MAX_RAW_MESSAGE).collect();
        Self {
            status: ApiStatus::from_http(http_status),
            http_status,
            message,
        }
    }

    /// Check if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }
}
