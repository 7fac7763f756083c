//! Market data error types

use thiserror::Error;

/// Errors that can occur during market data operations
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The session could not be started
    #[error("failed to start market data session: {0}")]
    Session(String),

    /// A request was rejected or its response could not be decoded
    #[error("market data request failed: {0}")]
    Request(String),

    /// Invalid security identifier
    #[error("Invalid security: {0}")]
    InvalidSecurity(String),

    /// Data not available
    #[error("Data not available: {0}")]
    DataNotAvailable(String),
}

impl From<MarketDataError> for common::Error {
    fn from(err: MarketDataError) -> Self {
        common::Error::data_source(err.to_string())
    }
}
