//! Common types and utilities for the cross-market health dashboard
//!
//! This crate provides shared types used across all health-check crates.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Shared domain types (MarketId, Selection)

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
