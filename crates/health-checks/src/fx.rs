//! FX health check: spot liquidity plus vol and skew levels
//!
//! Everything comes from one reference request. Vol levels are read from
//! dedicated tickers per pair and tenor:
//!
//! | Measure         | Ticker                 |
//! |-----------------|------------------------|
//! | Realized vol    | `{PAIR}H{T} Curncy`    |
//! | ATM implied vol | `{PAIR}V{T} Curncy`    |
//! | 25Δ risk rev.   | `{PAIR}25R{T} Curncy`  |
//! | 25Δ butterfly   | `{PAIR}25B{T} Curncy`  |

use crate::format::num;
use config::FxConfig;
use dashboard::{ReportProducer, RunContext};
use market_data::units::to_pips;
use market_data::{is_num, ReferenceData, ReferenceRequest};
use std::io::Write;
use tracing::{debug, instrument};

const SPOT_FIELDS: [&str; 3] = ["BID", "ASK", "PX_LAST"];
const LEVEL_FIELD: &str = "PX_LAST";

pub fn spot_ticker(pair: &str) -> String {
    format!("{} Curncy", pair)
}

pub fn realized_vol_ticker(pair: &str, tenor: &str) -> String {
    format!("{}H{} Curncy", pair, tenor)
}

pub fn atm_vol_ticker(pair: &str, tenor: &str) -> String {
    format!("{}V{} Curncy", pair, tenor)
}

pub fn rr25_ticker(pair: &str, tenor: &str) -> String {
    format!("{}25R{} Curncy", pair, tenor)
}

pub fn bf25_ticker(pair: &str, tenor: &str) -> String {
    format!("{}25B{} Curncy", pair, tenor)
}

/// Per-pair metrics
#[derive(Debug, Clone)]
pub struct FxRow {
    pub pair: String,
    pub spot: f64,
    pub bid: f64,
    pub ask: f64,
    pub spread: f64,
    pub spread_pips: f64,
    pub spread_bps_of_spot: f64,
    /// (tenor, level) in configured tenor order
    pub realized: Vec<(String, f64)>,
    pub atm_iv: Vec<(String, f64)>,
    pub rr25: Vec<(String, f64)>,
    pub bf25: Vec<(String, f64)>,
}

#[derive(Debug, Clone)]
pub struct FxHealthCheck {
    config: FxConfig,
}

impl FxHealthCheck {
    pub fn new(config: FxConfig) -> Self {
        Self { config }
    }

    /// One request covering spot quotes and every vol ticker
    pub fn build_request(&self) -> ReferenceRequest {
        let mut req = ReferenceRequest::new();
        for pair in &self.config.pairs {
            req.add(spot_ticker(pair), SPOT_FIELDS);
            for tenor in &self.config.realized_tenors {
                req.add(realized_vol_ticker(pair, tenor), [LEVEL_FIELD]);
            }
            for tenor in &self.config.vol_tenors {
                req.add(atm_vol_ticker(pair, tenor), [LEVEL_FIELD]);
                req.add(rr25_ticker(pair, tenor), [LEVEL_FIELD]);
                req.add(bf25_ticker(pair, tenor), [LEVEL_FIELD]);
            }
        }
        req
    }

    pub fn compute(&self, data: &ReferenceData) -> Vec<FxRow> {
        let levels = |tenors: &[String], ticker: fn(&str, &str) -> String, pair: &str| {
            tenors
                .iter()
                .map(|t| (t.clone(), data.number(&ticker(pair, t), LEVEL_FIELD)))
                .collect::<Vec<_>>()
        };

        self.config
            .pairs
            .iter()
            .map(|pair| {
                let spot_tkr = spot_ticker(pair);
                let bid = data.number(&spot_tkr, "BID");
                let ask = data.number(&spot_tkr, "ASK");
                let spot = data.number(&spot_tkr, "PX_LAST");

                let spread = ask - bid;
                let spread_pips = to_pips(pair, spread);
                let spread_bps_of_spot = if is_num(spread) && is_num(spot) && spot != 0.0 {
                    spread / spot * 1e4
                } else {
                    f64::NAN
                };

                FxRow {
                    pair: pair.clone(),
                    spot,
                    bid,
                    ask,
                    spread,
                    spread_pips,
                    spread_bps_of_spot,
                    realized: levels(&self.config.realized_tenors, realized_vol_ticker, pair),
                    atm_iv: levels(&self.config.vol_tenors, atm_vol_ticker, pair),
                    rr25: levels(&self.config.vol_tenors, rr25_ticker, pair),
                    bf25: levels(&self.config.vol_tenors, bf25_ticker, pair),
                }
            })
            .collect()
    }

    pub fn render(&self, rows: &[FxRow], out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "\nFX Health Check (spot liquidity + BVOL/derived vols & skew)\n")?;
        writeln!(
            out,
            "{:>10} {:>12} {:>12} {:>12} {:>10} {:>12} {:>14}",
            "PAIR", "SPOT", "BID", "ASK", "SPR", "SPR PIPS", "SPR BPS/Spot"
        )?;
        for r in rows {
            writeln!(
                out,
                "{:>10} {:>12} {:>12} {:>12} {:>10} {:>12} {:>14}",
                r.pair,
                num(r.spot, 6),
                num(r.bid, 6),
                num(r.ask, 6),
                num(r.spread, 6),
                num(r.spread_pips, 2),
                num(r.spread_bps_of_spot, 2),
            )?;
        }

        writeln!(out, "\nVol & Skew (levels from dedicated tickers)\n")?;
        for r in rows {
            writeln!(out, "{}:", r.pair)?;
            vol_line(out, "Realized Vol", &r.realized)?;
            vol_line(out, "ATM IVs     ", &r.atm_iv)?;
            vol_line(out, "25Δ RR      ", &r.rr25)?;
            vol_line(out, "25Δ Fly     ", &r.bf25)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

fn vol_line(out: &mut dyn Write, label: &str, levels: &[(String, f64)]) -> std::io::Result<()> {
    if levels.is_empty() {
        return Ok(());
    }
    let joined = levels
        .iter()
        .map(|(tenor, v)| format!("{}:{}", tenor, num(*v, 4)))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "  {} -> {}", label, joined)
}

impl ReportProducer for FxHealthCheck {
    #[instrument(name = "fx_health_check", skip_all)]
    fn run(&self, ctx: &RunContext<'_>, out: &mut dyn Write) -> common::Result<()> {
        let request = self.build_request();
        let data = {
            let mut session = ctx.source.open_session()?;
            session.reference(&request)?
        };
        debug!(securities = request.len(), "FX reference data received");

        let rows = self.compute(&data);
        self.render(&rows, out)?;
        Ok(())
    }
}
