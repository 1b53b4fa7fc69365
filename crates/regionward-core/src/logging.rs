//! Structured logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Failure to install the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A global subscriber is already set, or the filter is invalid.
    #[error("failed to install tracing subscriber: {reason}")]
    Install {
        /// What the subscriber builder reported.
        reason: String,
    },
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.level` when it is set and valid.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| LoggingError::Install {
        reason: err.to_string(),
    })
}
