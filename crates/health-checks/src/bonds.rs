//! Bond market health check: Treasury curve, credit OAS, rates vol and
//! ETF liquidity proxies
//!
//! Yields are quoted in percent, OAS in basis points.
//!
//! The diagnostics heading carries no dashed underline. The original scripts
//! printed one, which the flag extractor took for a flag; without it a report
//! with no triggered heuristics shows as OK rather than FLAGS.

use crate::format::num;
use chrono::Duration;
use config::{BondsConfig, SeriesRef};
use dashboard::{ReportProducer, RunContext};
use market_data::stats::{bps_of_mid, last_change, stdev_last};
use market_data::{is_num, HistoricalData, HistoryRequest, ReferenceData, ReferenceRequest, Session};
use std::io::Write;
use tracing::{debug, instrument};

/// Quote metrics for one liquidity-proxy ETF
#[derive(Debug, Clone)]
pub struct EtfLiquidity {
    pub ticker: String,
    pub bid: f64,
    pub ask: f64,
    pub last: f64,
    pub volume: f64,
    pub spread: f64,
    pub spread_bps_of_mid: f64,
}

#[derive(Debug, Clone)]
pub struct BondMetrics {
    pub y2: f64,
    pub y10: f64,
    pub y3m: f64,
    pub y2_stdev_bp: f64,
    pub y10_stdev_bp: f64,
    pub y3m_stdev_bp: f64,
    pub slope_2s10s_bp: f64,
    pub slope_3m10y_bp: f64,
    pub ig_oas: f64,
    pub hy_oas: f64,
    pub ig_change_bp: f64,
    pub hy_change_bp: f64,
    pub move_index: f64,
    pub liquidity: Vec<EtfLiquidity>,
}

#[derive(Debug, Clone)]
pub struct BondsHealthCheck {
    config: BondsConfig,
}

impl BondsHealthCheck {
    pub fn new(config: BondsConfig) -> Self {
        Self { config }
    }

    fn etfs(&self) -> impl Iterator<Item = &str> {
        [&self.config.ig_etf, &self.config.hy_etf]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    pub fn build_request(&self) -> ReferenceRequest {
        let cfg = &self.config;
        let mut req = ReferenceRequest::new();
        for s in [&cfg.ust_2y, &cfg.ust_10y, &cfg.ust_3m, &cfg.ig_oas, &cfg.hy_oas, &cfg.move_index] {
            req.add(s.ticker.as_str(), [s.field.as_str()]);
        }
        for etf in self.etfs() {
            req.add(etf, cfg.etf_fields.all());
        }
        req
    }

    fn fetch_history(&self, session: &mut dyn Session, ctx: &RunContext<'_>) -> market_data::Result<HistoricalData> {
        let cfg = &self.config;
        let start = ctx.as_of - Duration::days(i64::from(cfg.lookback_days));
        let mut hist = HistoricalData::new();
        for s in [&cfg.ust_2y, &cfg.ust_10y, &cfg.ust_3m, &cfg.ig_oas, &cfg.hy_oas] {
            let req = HistoryRequest::new(s.ticker.as_str(), s.field.as_str(), start, ctx.as_of);
            hist.extend(session.history(&req)?);
        }
        Ok(hist)
    }

    pub fn compute(&self, data: &ReferenceData, hist: &HistoricalData) -> BondMetrics {
        let cfg = &self.config;
        let obs = cfg.obs_days;
        let snap = |s: &SeriesRef| data.number(&s.ticker, &s.field);
        let stdev_bp = |s: &SeriesRef| stdev_last(&hist.values(&s.ticker), obs) * 100.0;
        let change = |s: &SeriesRef| last_change(&hist.values(&s.ticker), obs);

        let y2 = snap(&cfg.ust_2y);
        let y10 = snap(&cfg.ust_10y);
        let y3m = snap(&cfg.ust_3m);

        let fields = &cfg.etf_fields;
        let liquidity = self
            .etfs()
            .map(|ticker| {
                let bid = data.number(ticker, &fields.bid);
                let ask = data.number(ticker, &fields.ask);
                EtfLiquidity {
                    ticker: ticker.to_string(),
                    bid,
                    ask,
                    last: data.number(ticker, &fields.last),
                    volume: data.number(ticker, &fields.volume),
                    spread: ask - bid,
                    spread_bps_of_mid: bps_of_mid(bid, ask),
                }
            })
            .collect();

        BondMetrics {
            y2,
            y10,
            y3m,
            y2_stdev_bp: stdev_bp(&cfg.ust_2y),
            y10_stdev_bp: stdev_bp(&cfg.ust_10y),
            y3m_stdev_bp: stdev_bp(&cfg.ust_3m),
            slope_2s10s_bp: (y10 - y2) * 100.0,
            slope_3m10y_bp: (y10 - y3m) * 100.0,
            ig_oas: snap(&cfg.ig_oas),
            hy_oas: snap(&cfg.hy_oas),
            ig_change_bp: change(&cfg.ig_oas),
            hy_change_bp: change(&cfg.hy_oas),
            move_index: snap(&cfg.move_index),
            liquidity,
        }
    }

    pub fn flags(&self, m: &BondMetrics) -> Vec<String> {
        let t = &self.config.thresholds;
        let obs = self.config.obs_days;
        let mut flags = Vec::new();

        if is_num(m.slope_2s10s_bp) && m.slope_2s10s_bp < t.curve_inversion_bp {
            flags.push(format!("2s10s inverted ({} bp)", num(m.slope_2s10s_bp, 1)));
        }
        if is_num(m.ig_change_bp) && m.ig_change_bp > t.ig_widen_bp {
            flags.push(format!(
                "IG OAS widened > {:.1} bp over {}d ({} bp)",
                t.ig_widen_bp,
                obs,
                num(m.ig_change_bp, 1)
            ));
        }
        if is_num(m.hy_change_bp) && m.hy_change_bp > t.hy_widen_bp {
            flags.push(format!(
                "HY OAS widened > {:.1} bp over {}d ({} bp)",
                t.hy_widen_bp,
                obs,
                num(m.hy_change_bp, 1)
            ));
        }
        flags
    }

    pub fn render(&self, m: &BondMetrics, out: &mut dyn Write) -> std::io::Result<()> {
        let obs = self.config.obs_days;

        writeln!(out, "\nBond Market Health Check\n")?;

        writeln!(out, "Rates / Curve")?;
        writeln!(out, "-------------")?;
        writeln!(out, "UST 2Y:        {}%   (σ_{}d ≈ {} bp)", num(m.y2, 2), obs, num(m.y2_stdev_bp, 1))?;
        writeln!(out, "UST 10Y:       {}%  (σ_{}d ≈ {} bp)", num(m.y10, 2), obs, num(m.y10_stdev_bp, 1))?;
        writeln!(out, "UST 3M:        {}%  (σ_{}d ≈ {} bp)", num(m.y3m, 2), obs, num(m.y3m_stdev_bp, 1))?;
        writeln!(out, "Slope 2s10s:   {} bp", num(m.slope_2s10s_bp, 1))?;
        writeln!(out, "Slope 3m10y:   {} bp", num(m.slope_3m10y_bp, 1))?;
        writeln!(out)?;

        writeln!(out, "Credit Spreads (OAS)")?;
        writeln!(out, "--------------------")?;
        writeln!(out, "IG OAS:        {} bp   ({}d Δ: {} bp)", num(m.ig_oas, 1), obs, num(m.ig_change_bp, 1))?;
        writeln!(out, "HY OAS:        {} bp   ({}d Δ: {} bp)", num(m.hy_oas, 1), obs, num(m.hy_change_bp, 1))?;
        writeln!(out)?;

        writeln!(out, "Rates Volatility Proxy")?;
        writeln!(out, "----------------------")?;
        writeln!(out, "MOVE Index:    {}", num(m.move_index, 1))?;
        writeln!(out)?;

        if !m.liquidity.is_empty() {
            writeln!(out, "Liquidity Proxies (ETFs)")?;
            writeln!(out, "------------------------")?;
            for etf in &m.liquidity {
                writeln!(
                    out,
                    "{}: bid {}, ask {}, spr {} ({} bp of mid), vol {}",
                    etf.ticker,
                    num(etf.bid, 2),
                    num(etf.ask, 2),
                    num(etf.spread, 3),
                    num(etf.spread_bps_of_mid, 1),
                    num(etf.volume, 0)
                )?;
            }
            writeln!(out)?;
        }

        // No underline: the extractor would read it as a flag
        writeln!(out, "Diagnostics / Flags (heuristics)")?;
        let flags = self.flags(m);
        if flags.is_empty() {
            writeln!(out, "No heuristic flags triggered.")?;
        } else {
            for flag in &flags {
                writeln!(out, "- {}", flag)?;
            }
        }
        Ok(())
    }
}

impl ReportProducer for BondsHealthCheck {
    #[instrument(name = "bonds_health_check", skip_all)]
    fn run(&self, ctx: &RunContext<'_>, out: &mut dyn Write) -> common::Result<()> {
        let (data, hist) = {
            let mut session = ctx.source.open_session()?;
            let data = session.reference(&self.build_request())?;
            let hist = self.fetch_history(session.as_mut(), ctx)?;
            (data, hist)
        };
        debug!(as_of = %ctx.as_of, "Bond market data received");

        let metrics = self.compute(&data, &hist);
        self.render(&metrics, out)?;
        Ok(())
    }
}
