//! Property-based tests for rust-common crate.
//!
//! These tests verify universal properties across all inputs using proptest.

use proptest::prelude::*;
use rust_common::{ApiError, ApiStatus};

const ALL_STATUSES: [ApiStatus; 16] = [
    ApiStatus::Cancelled,
    ApiStatus::Unknown,
    ApiStatus::InvalidArgument,
    ApiStatus::DeadlineExceeded,
    ApiStatus::NotFound,
    ApiStatus::AlreadyExists,
    ApiStatus::PermissionDenied,
    ApiStatus::ResourceExhausted,
    ApiStatus::FailedPrecondition,
    ApiStatus::Aborted,
    ApiStatus::OutOfRange,
    ApiStatus::Unimplemented,
    ApiStatus::Internal,
    ApiStatus::Unavailable,
    ApiStatus::DataLoss,
    ApiStatus::Unauthenticated,
];

fn status_strategy() -> impl Strategy<Value = ApiStatus> {
    prop::sample::select(ALL_STATUSES.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The envelope's status name always decides the classification,
    /// whatever HTTP code carried it.
    #[test]
    fn prop_envelope_status_is_authoritative(
        status in status_strategy(),
        http_status in 400u16..600,
        message in "[a-zA-Z0-9 .\\[\\]/-]{0,80}",
    ) {
        let body = serde_json::json!({
            "error": {
                "code": http_status,
                "message": message,
                "status": status.as_str(),
            }
        });
        let bytes = serde_json::to_vec(&body).expect("serialize envelope");
        let err = ApiError::from_response(http_status, &bytes);

        prop_assert_eq!(err.status, status);
        prop_assert_eq!(err.http_status, http_status);
        prop_assert_eq!(&err.message, &message);
        prop_assert_eq!(err.is_retryable(), status.is_retryable());
    }

    /// Server errors never classify as client-side mistakes.
    #[test]
    fn prop_server_errors_are_not_client_errors(code in 500u16..600) {
        let status = ApiStatus::from_http(code);
        prop_assert!(!matches!(
            status,
            ApiStatus::NotFound
                | ApiStatus::InvalidArgument
                | ApiStatus::PermissionDenied
                | ApiStatus::Unauthenticated
                | ApiStatus::AlreadyExists
        ));
    }

    /// Bodies that are not an error envelope fall back to the HTTP code and
    /// keep a bounded excerpt of the body.
    #[test]
    fn prop_unparseable_body_falls_back(
        code in 400u16..600,
        body in "[^{}]{0,2000}",
    ) {
        let err = ApiError::from_response(code, body.as_bytes());
        prop_assert_eq!(err.status, ApiStatus::from_http(code));
        prop_assert!(err.message.chars().count() <= 512);
    }
}

#[test]
fn test_retryable_statuses() {
    let retryable: Vec<_> = ALL_STATUSES
        .iter()
        .copied()
        .filter(|status| status.is_retryable())
        .collect();
    assert_eq!(
        retryable,
        vec![
            ApiStatus::DeadlineExceeded,
            ApiStatus::ResourceExhausted,
            ApiStatus::Aborted,
            ApiStatus::Unavailable,
        ]
    );
}

#[test]
fn test_status_names_are_parseable() {
    for status in ALL_STATUSES {
        assert_eq!(ApiStatus::from_name(status.as_str()), Some(status));
    }
    assert_eq!(ApiStatus::from_name("not_found"), None);
}
