//! Tracing subscriber setup for hosts embedding the cache.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the host, which can call [`init_tracing`] with its
//! [`LoggingConfig`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ConfigError, LoggingConfig};

/// Builds the filter for a logging config.
///
/// `RUST_LOG` wins over the configured level when it is set and parses.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs a global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for an unknown format, or
/// [`ConfigError::ParseError`] if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = match config.format.as_str() {
        "text" => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        other => {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!("value '{other}' is invalid, expected one of: text, json"),
            })
        }
    };

    result.map_err(|e| ConfigError::ParseError(e.to_string()))
}
