use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the call session crate.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced while configuring or observing a call session.
///
/// Reconciliation, layout and UI transitions are total and never produce
/// these; only configuration and log sinks can fail.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
