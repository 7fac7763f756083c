//! Dashboard run: resolve, capture, extract, aggregate

use crate::capture::capture_output;
use crate::extract::extract_flags;
use crate::producer::RunContext;
use crate::registry::Registry;
use chrono::{DateTime, Utc};
use common::{MarketId, Selection};
use tracing::{info, info_span, warn};

/// Outcome of one market
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketResult {
    pub market: MarketId,
    pub title: String,
    pub report: String,
    /// Empty whenever `error` is set
    pub flags: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Flags,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Flags => "FLAGS",
            Status::Error => "ERROR",
        })
    }
}

impl MarketResult {
    pub fn status(&self) -> Status {
        if self.error.is_some() {
            Status::Error
        } else if !self.flags.is_empty() {
            Status::Flags
        } else {
            Status::Ok
        }
    }
}

/// A market that could not be resolved to a producer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub market: MarketId,
    pub message: String,
}

/// Process exit status of a dashboard run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every market ran, none flagged
    Clean,
    /// At least one market flagged
    Flagged,
    /// At least one market could not be loaded
    LoadFailure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Clean => 0,
            ExitStatus::Flagged => 1,
            ExitStatus::LoadFailure => 2,
        }
    }
}

/// Results of one invocation, in selection order
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub timestamp: DateTime<Utc>,
    pub results: Vec<MarketResult>,
    pub load_failures: Vec<LoadFailure>,
}

impl DashboardRun {
    pub fn exit_status(&self) -> ExitStatus {
        if !self.load_failures.is_empty() {
            ExitStatus::LoadFailure
        } else if self.results.iter().any(|r| !r.flags.is_empty()) {
            ExitStatus::Flagged
        } else {
            ExitStatus::Clean
        }
    }
}

/// Markets to run: all registered ones in registry order, or the explicit
/// list with repeats collapsed
pub fn resolve_selection(registry: &Registry, selection: &Selection) -> Vec<MarketId> {
    match selection {
        Selection::All => registry.registered(),
        Selection::Markets(markets) => Selection::dedup(markets),
    }
}

/// Run the selected markets one after another
pub fn run_dashboard(registry: &Registry, selection: &Selection, ctx: &RunContext<'_>) -> DashboardRun {
    let timestamp = Utc::now();
    let markets = resolve_selection(registry, selection);
    info!(markets = ?markets, as_of = %ctx.as_of, "Running dashboard");

    let mut results = Vec::with_capacity(markets.len());
    let mut load_failures = Vec::new();

    for market in markets {
        let _span = info_span!("market", %market).entered();

        let entry = match registry.resolve(market) {
            Ok(entry) => entry,
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "Market could not be loaded");
                results.push(MarketResult {
                    market,
                    title: market.title().to_string(),
                    report: String::new(),
                    flags: Vec::new(),
                    error: Some(message.clone()),
                });
                load_failures.push(LoadFailure { market, message });
                continue;
            }
        };

        let captured = capture_output(|out| entry.producer.run(ctx, out));
        let flags = match captured.error {
            Some(_) => Vec::new(),
            None => extract_flags(&captured.output),
        };
        info!(flags = flags.len(), failed = captured.error.is_some(), "Market finished");

        results.push(MarketResult {
            market,
            title: entry.title.to_string(),
            report: captured.output,
            flags,
            error: captured.error,
        });
    }

    DashboardRun {
        timestamp,
        results,
        load_failures,
    }
}
