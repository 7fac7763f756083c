//! Cross-Market Diagnostic Meta-Dashboard
//!
//! Runs a selection of market report producers, captures each report,
//! extracts its flags and renders the combined result.
//!
//! # Core Components
//!
//! - [`registry`] - `MarketId` to producer mapping built at startup
//! - [`producer`] - The `ReportProducer` contract and its run context
//! - [`capture`] - In-memory output capture, failures turned into data
//! - [`extract`] - Flag extraction from `Diagnostics` blocks
//! - [`aggregate`] - Per-market results and the process exit status
//! - [`render`] - Text and JSON renderers
//!
//! # Key Invariants
//!
//! - A result carries an error or a (possibly empty) flag list, never both
//! - Exit status 2 only for markets that could not be loaded; a producer
//!   failing at run time never yields 2

pub mod aggregate;
pub mod capture;
pub mod error;
pub mod extract;
pub mod producer;
pub mod registry;
pub mod render;

pub use aggregate::{run_dashboard, DashboardRun, ExitStatus, LoadFailure, MarketResult, Status};
pub use capture::{capture_output, Captured};
pub use error::DashboardError;
pub use extract::extract_flags;
pub use producer::{ReportProducer, RunContext};
pub use registry::{Registry, RegistryEntry};
pub use render::{render_json, render_load_failures, render_text};
