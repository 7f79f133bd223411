#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for schema-cache binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is left
//! to the binary, which calls [`init`] once with its [`LoggingConfig`].

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The level is not a valid filter directive.
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter {
        /// Directive as configured
        filter: String,
        /// Parser message
        reason: String,
    },
    /// The log file could not be opened.
    #[error("Failed to open log file {path}: {source}")]
    File {
        /// Configured path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Builds the event filter. `RUST_LOG`, when set and valid, wins over `level`.
pub fn filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }
    EnvFilter::try_new(level)
        .map_err(|e| LoggingError::Filter { filter: level.to_string(), reason: e.to_string() })
}

/// Installs the global fmt subscriber.
///
/// Events go to `config.file` (appended, no ANSI colours) when set and to
/// stderr otherwise.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = filter(&config.level)?;

    let (console_layer, file_layer) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File { path: path.clone(), source })?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Arc::new(file));
            (None, Some(layer))
        }
        None => {
            let layer =
                tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(level = %config.level, file = ?config.file, "Logging initialized");
    Ok(())
}

/// Emits a one-off trace event tagged with the calling module.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(module, "{}", msg);
}
