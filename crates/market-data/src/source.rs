//! Market data source traits
//!
//! A [`DataSource`] hands out sessions. A report producer opens exactly one
//! session per run and drops it when done, whether the run succeeded or not;
//! implementations release their resources in `Drop`.

use crate::types::{HistoricalData, HistoryRequest, ReferenceData, ReferenceRequest};
use crate::Result;

/// Something that can open market data sessions
pub trait DataSource {
    /// Human-readable description, used in logs
    fn describe(&self) -> String;

    /// Start a session
    ///
    /// Fails with [`crate::MarketDataError::Session`] when the source is
    /// unreachable.
    fn open_session(&self) -> Result<Box<dyn Session + '_>>;
}

/// An open market data session
pub trait Session {
    /// Point-in-time values for each requested security's fields
    ///
    /// Every requested security appears in the response, with an empty field
    /// map when the source knows nothing about it.
    fn reference(&mut self, request: &ReferenceRequest) -> Result<ReferenceData>;

    /// Daily history of one field between the request's start and end dates
    fn history(&mut self, request: &HistoryRequest) -> Result<HistoricalData>;

    /// Rows of a bulk (table) field, e.g. index constituents
    fn bulk_members(&mut self, security: &str, field: &str, max_members: usize) -> Result<Vec<String>>;
}
