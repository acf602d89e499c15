//! Structured logging setup.
//!
//! The library itself only emits `tracing` events. Binaries, tests and
//! benches that want to see them call [`init_logging`] once at startup.

use crate::config::LoggingConfig;
use crate::error::{Result, TokenError};
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber configured from `config`.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set. Calling this
/// more than once keeps the first subscriber and returns `Ok(false)`.
///
/// # Errors
/// Returns `TokenError::ConfigError` if `RUST_LOG` holds an invalid filter
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives)
            .map_err(|e| TokenError::ConfigError(format!("Invalid RUST_LOG filter: {e}")))?,
        Err(_) => EnvFilter::new(config.log_level.as_str().to_lowercase()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if config.json_format {
        builder.json().try_init().is_ok()
    } else {
        builder.compact().try_init().is_ok()
    };

    if installed {
        tracing::debug!(app_name = %config.app_name, "Logging initialised");
    }
    Ok(installed)
}
