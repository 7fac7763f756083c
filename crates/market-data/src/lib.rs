//! Market data access for the health checks
//!
//! This crate provides the session abstraction the market health checks
//! query, plus the numeric helpers they share.
//!
//! # Core Components
//!
//! - [`source`] - `DataSource` / `Session` traits
//! - [`snapshot`] - File-backed source used in place of a live terminal
//! - [`value`] - Raw field values and NaN-tolerant coercion
//! - [`units`] - Percent / decimal / basis-point / pip conversions
//! - [`stats`] - Median, stdev, realized vol, roll yield, spreads
//!
//! # Key Invariants
//!
//! - Missing data is NaN, never an error
//! - A session is released when dropped, on success and failure alike

pub mod error;
pub mod snapshot;
pub mod source;
pub mod stats;
pub mod types;
pub mod units;
pub mod value;

pub use error::MarketDataError;
pub use snapshot::{MarketSnapshot, SnapshotSource};
pub use source::{DataSource, Session};
pub use types::{HistoricalData, HistoryRequest, Observation, ReferenceData, ReferenceRequest};
pub use value::{is_num, to_number, FieldValue};

pub type Result<T> = std::result::Result<T, MarketDataError>;
