//! `tracing-subscriber` setup for binaries and live test suites.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use tracing_subscriber::util::TryInitError;

/// Default [`TracingConfig::log_level`]: quiet dependencies, client
/// lifecycle events visible.
pub const DEFAULT_FILTER: &str = "warn,secret_manager_client=info,rust_common=info";

/// Subscriber settings for a process using the API clients.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Recorded on the startup event
    pub service_name: String,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            log_level: DEFAULT_FILTER.to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Name recorded on the startup event.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Set the fallback filter directive.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over [`TracingConfig::log_level`].
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed, which
/// happens when several tests in one process initialise tracing.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(config.filter());

    if config.json_output {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    tracing::info!(service = %config.service_name, "Tracing initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.service_name, "rust-common");
        assert_eq!(config.log_level, DEFAULT_FILTER);
        assert!(!config.json_output);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::default()
            .with_service_name("secret-manager")
            .with_log_level("secret_manager_client=debug")
            .with_json_output();

        assert_eq!(config.service_name, "secret-manager");
        assert_eq!(config.log_level, "secret_manager_client=debug");
        assert!(config.json_output);
    }

    #[test]
    fn test_second_init_reports_error() {
        let config = TracingConfig::default().with_log_level("warn");
        let _ = init_tracing(&config);
        // Only one global subscriber may exist per process.
        assert!(init_tracing(&config).is_err());
    }
}
