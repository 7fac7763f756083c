//! Market health-check producers
//!
//! One [`ReportProducer`](dashboard::ReportProducer) per market. Each opens
//! a single market data session, computes its metrics and writes a text
//! report. Money, Bonds and Futures & Options end with a `Diagnostics`
//! block that the dashboard reads flags from.
//!
//! # Core Components
//!
//! - [`fx`] - Spot liquidity and vol/skew levels
//! - [`money`] - USD funding benchmarks and the FOMC band
//! - [`bonds`] - Treasury curve, credit OAS, rates vol, ETF liquidity
//! - [`equities`] - Index breadth, volatility, liquidity, valuation
//! - [`futures_options`] - Futures curves, option surface and activity

pub mod bonds;
pub mod equities;
pub mod format;
pub mod futures_options;
pub mod fx;
pub mod money;

pub use bonds::BondsHealthCheck;
pub use equities::EquitiesHealthCheck;
pub use futures_options::FuturesOptionsHealthCheck;
pub use fx::FxHealthCheck;
pub use money::MoneyHealthCheck;

use common::MarketId;
use config::HealthConfig;
use dashboard::Registry;
use tracing::info;

/// Registry with a producer for every enabled market
pub fn standard_registry(config: &HealthConfig) -> Registry {
    let mut registry = Registry::new();
    if config.fx.enabled {
        registry.register(MarketId::Fx, FxHealthCheck::new(config.fx.clone()));
    }
    if config.money.enabled {
        registry.register(MarketId::Money, MoneyHealthCheck::new(config.money.clone()));
    }
    if config.bonds.enabled {
        registry.register(MarketId::Bonds, BondsHealthCheck::new(config.bonds.clone()));
    }
    if config.equities.enabled {
        registry.register(MarketId::Equities, EquitiesHealthCheck::new(config.equities.clone()));
    }
    if config.futures_options.enabled {
        registry.register(
            MarketId::FuturesOptions,
            FuturesOptionsHealthCheck::new(config.futures_options.clone()),
        );
    }
    info!(markets = registry.len(), "Market registry built");
    registry
}
