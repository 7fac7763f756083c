//! Common error types for the health dashboard

use thiserror::Error;

/// Common error type used across the health-check crates
///
/// Report producers return this type at their boundary so the dashboard can
/// turn a failed run into data instead of aborting the process.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input was provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The market data source failed (session start, request, decoding)
    #[error("{0}")]
    DataSource(String),

    /// Writing the report failed
    #[error("Report output error: {0}")]
    Io(#[from] std::io::Error),

    /// The producer asked to stop early; output written so far is kept
    #[error("Terminated: {0}")]
    Terminated(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using the common Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a data source error
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    /// Create a termination request
    pub fn terminated(reason: impl Into<String>) -> Self {
        Self::Terminated(reason.into())
    }

    /// Whether this error is a termination request rather than a failure
    pub fn is_termination(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}
