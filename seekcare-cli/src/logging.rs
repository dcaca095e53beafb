//! Logging setup for the command line tool.
//!
//! Events go to stderr so the report on stdout stays clean. The filter is read from `RUST_LOG`
//! and defaults to warnings only.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Another subscriber was installed before.
    #[error("failed to install global tracing subscriber: {0}")]
    SetGlobal(Box<dyn std::error::Error + Send + Sync>),
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, fails if one is installed already
pub fn init() -> Result<(), LoggingError> {
    fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(LoggingError::SetGlobal)
}
