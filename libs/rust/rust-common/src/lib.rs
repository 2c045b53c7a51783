//! Shared library for cross-cutting concerns in Google API clients.
//!
//! This crate provides centralized implementations for:
//! - Canonical API status classification and error envelope parsing
//! - HTTP client configuration and building
//! - `tracing-subscriber` initialisation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod tracing_config;

pub use error::{ApiError, ApiStatus};
pub use http::{API_CLIENT_HEADER, HttpBuildError, HttpConfig, build_http_client};
pub use tracing_config::{TracingConfig, init_tracing};
