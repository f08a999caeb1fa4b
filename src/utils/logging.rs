//! Structured logging setup.
//!
//! The crate itself only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_logging`] once at startup. `RUST_LOG` takes precedence over
//! the configured level.

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber according to `config`.
///
/// # Errors
/// Returns `ProtocolError::ConfigError` if a global subscriber is already set
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| {
        ProtocolError::ConfigError(format!("Failed to install tracing subscriber: {e}"))
    })?;

    tracing::debug!(json = config.json_format, "Logging initialized");
    Ok(())
}
