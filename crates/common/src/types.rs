//! Common types used across the health dashboard
//!
//! This module provides the market identifiers shared by the registry,
//! the configuration and the renderers.

use serde::{Deserialize, Serialize};

/// Identifier of one market health check
///
/// The declaration order is the registry order used by `--all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketId {
    #[serde(rename = "FX")]
    Fx,
    Money,
    Bonds,
    Equities,
    FuturesOptions,
}

impl MarketId {
    /// Every market, in registry order
    pub const ALL: [MarketId; 5] = [
        MarketId::Fx,
        MarketId::Money,
        MarketId::Bonds,
        MarketId::Equities,
        MarketId::FuturesOptions,
    ];

    /// Identifier as used on the command line and in JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketId::Fx => "FX",
            MarketId::Money => "Money",
            MarketId::Bonds => "Bonds",
            MarketId::Equities => "Equities",
            MarketId::FuturesOptions => "FuturesOptions",
        }
    }

    /// Human-readable title shown in reports
    pub fn title(&self) -> &'static str {
        match self {
            MarketId::Fx => "Foreign Exchange (FX)",
            MarketId::Money => "Money Markets",
            MarketId::Bonds => "Bond Markets",
            MarketId::Equities => "Equity Markets",
            MarketId::FuturesOptions => "Futures & Options",
        }
    }
}

impl std::fmt::Display for MarketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MarketId {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MarketId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| crate::Error::invalid_input(format!("unknown market: {}", s)))
    }
}

/// Markets chosen for one dashboard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every registered market, in registry order
    All,
    /// These markets, in this order
    Markets(Vec<MarketId>),
}

impl Selection {
    /// Explicit markets with repeats dropped, keeping each first occurrence
    pub fn dedup(markets: &[MarketId]) -> Vec<MarketId> {
        let mut out = Vec::with_capacity(markets.len());
        for m in markets {
            if !out.contains(m) {
                out.push(*m);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_id_round_trip_through_str() {
        for market in MarketId::ALL {
            assert_eq!(market.as_str().parse::<MarketId>().unwrap(), market);
        }
    }

    #[test]
    fn test_market_id_is_case_sensitive() {
        assert!("fx".parse::<MarketId>().is_err());
        assert!("futuresoptions".parse::<MarketId>().is_err());
    }

    #[test]
    fn test_market_id_serializes_as_cli_name() {
        let json = serde_json::to_string(&MarketId::Fx).unwrap();
        assert_eq!(json, "\"FX\"");
        let json = serde_json::to_string(&MarketId::FuturesOptions).unwrap();
        assert_eq!(json, "\"FuturesOptions\"");
    }

    #[test]
    fn test_selection_dedup_keeps_first_occurrence() {
        let picked = Selection::dedup(&[MarketId::Bonds, MarketId::Fx, MarketId::Bonds]);
        assert_eq!(picked, vec![MarketId::Bonds, MarketId::Fx]);
    }

    #[test]
    fn test_titles() {
        assert_eq!(MarketId::Fx.title(), "Foreign Exchange (FX)");
        assert_eq!(MarketId::FuturesOptions.title(), "Futures & Options");
    }
}
