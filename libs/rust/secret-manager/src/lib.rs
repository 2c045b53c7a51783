//! Google Cloud Secret Manager client.
//!
//! Reads the latest version of a secret, appends new versions (creating the
//! secret on first write) and deletes secrets. Every call is a plain remote
//! request bounded by a caller-supplied [`CallContext`]; nothing is cached
//! and nothing is retried.
//!
//! ```no_run
//! use secret_manager_client::{CallContext, SecretClient};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), secret_manager_client::SecretManagerError> {
//! let ctx = CallContext::background().with_timeout(Duration::from_secs(5));
//! let client = SecretClient::connect(ctx, "my-project", ["europe-west1", "europe-west6"])?;
//!
//! client.set("db-password", b"hunter2").await?;
//! assert_eq!(client.get("db-password").await?, b"hunter2");
//! client.delete("db-password").await?;
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod model;
pub mod provider;
pub mod resource;

pub use client::SecretClient;
pub use config::SecretManagerConfig;
pub use context::{CallContext, CancelHandle};
pub use credentials::Credentials;
pub use error::{SecretManagerError, SecretManagerResult};
pub use provider::SecretStore;
pub use resource::{SecretName, SecretVersionName};
