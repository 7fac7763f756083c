//! Observability infrastructure for the health dashboard
//!
//! This crate provides structured logging via tracing.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("mktdash", LogFormat::Compact)?;
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
