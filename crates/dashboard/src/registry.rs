//! Market registry
//!
//! Maps each [`MarketId`] to the producer that reports on it. Built once at
//! startup and read-only afterwards.

use crate::error::{DashboardError, Result};
use crate::producer::ReportProducer;
use common::MarketId;
use std::collections::BTreeMap;
use tracing::debug;

/// A registered market
pub struct RegistryEntry {
    pub market: MarketId,
    pub title: &'static str,
    pub producer: Box<dyn ReportProducer>,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("market", &self.market)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<MarketId, RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `producer` for `market`, replacing any earlier one
    pub fn register(&mut self, market: MarketId, producer: impl ReportProducer + 'static) -> &mut Self {
        debug!(%market, "Registering report producer");
        self.entries.insert(
            market,
            RegistryEntry {
                market,
                title: market.title(),
                producer: Box::new(producer),
            },
        );
        self
    }

    pub fn resolve(&self, market: MarketId) -> Result<&RegistryEntry> {
        self.entries
            .get(&market)
            .ok_or(DashboardError::UnregisteredMarket(market))
    }

    /// Registered markets in registry order
    pub fn registered(&self) -> Vec<MarketId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::RunContext;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn noop(_ctx: &RunContext<'_>, _out: &mut dyn Write) -> common::Result<()> {
        Ok(())
    }

    #[test]
    fn test_registered_follows_registry_order() {
        let mut registry = Registry::new();
        registry
            .register(MarketId::FuturesOptions, noop)
            .register(MarketId::Fx, noop)
            .register(MarketId::Bonds, noop);

        assert_eq!(
            registry.registered(),
            vec![MarketId::Fx, MarketId::Bonds, MarketId::FuturesOptions]
        );
    }

    #[test]
    fn test_resolve_unregistered_market() {
        let mut registry = Registry::new();
        registry.register(MarketId::Fx, noop);

        let entry = registry.resolve(MarketId::Fx).unwrap();
        assert_eq!(entry.title, "Foreign Exchange (FX)");

        let err = registry.resolve(MarketId::Money).unwrap_err();
        assert_matches!(err, DashboardError::UnregisteredMarket(MarketId::Money));
        assert_eq!(err.to_string(), "no producer registered for market 'Money'");
    }
}
