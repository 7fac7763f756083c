//! Dashboard error types

use common::MarketId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// No producer is registered for the market (e.g. disabled in configuration)
    #[error("no producer registered for market '{0}'")]
    UnregisteredMarket(MarketId),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
