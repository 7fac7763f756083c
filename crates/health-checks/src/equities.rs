//! Equity market health check: breadth, volatility, liquidity and valuation
//! over the members of one index

use crate::format::{num, pct_value};
use chrono::Duration;
use config::EquitiesConfig;
use dashboard::{ReportProducer, RunContext};
use market_data::stats::{bps_of_mid, cap_weighted_pe, median, realized_vol_from_prices, TRADING_DAYS_PER_YEAR};
use market_data::{is_num, HistoricalData, HistoryRequest, ReferenceData, ReferenceRequest, Session};
use std::io::Write;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct EquityMetrics {
    pub universe: usize,
    /// Share of members above their 200D moving average, in percent
    pub breadth_pct: f64,
    /// Annualized, decimal
    pub realized_vol: f64,
    pub vol_proxy: f64,
    pub dollar_volume: f64,
    pub median_spread_bps: f64,
    pub index_fwd_pe: f64,
    pub cap_weighted_fwd_pe: f64,
    pub erp_bp: f64,
    pub ten_year: f64,
}

#[derive(Debug, Clone)]
pub struct EquitiesHealthCheck {
    config: EquitiesConfig,
}

impl EquitiesHealthCheck {
    pub fn new(config: EquitiesConfig) -> Self {
        Self { config }
    }

    /// Member securities from the index's bulk members field
    fn fetch_members(&self, session: &mut dyn Session) -> market_data::Result<Vec<String>> {
        let cfg = &self.config;
        let rows = session.bulk_members(&cfg.index.ticker, &cfg.members_field, cfg.max_members)?;
        Ok(rows
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(|m| format!("{}{}", m, cfg.member_suffix))
            .collect())
    }

    pub fn build_request(&self, members: &[String]) -> ReferenceRequest {
        let cfg = &self.config;
        let mut req = ReferenceRequest::new();
        for member in members {
            req.add(member.as_str(), cfg.member_fields.all());
        }
        req.add(cfg.index.ticker.as_str(), [cfg.index.field.as_str(), cfg.index_fwd_pe_field.as_str()]);
        for series in [&cfg.vol_proxy, &cfg.ten_year].into_iter().flatten() {
            req.add(series.ticker.as_str(), [series.field.as_str()]);
        }
        req
    }

    pub fn compute(&self, members: &[String], data: &ReferenceData, hist: &HistoricalData) -> EquityMetrics {
        let cfg = &self.config;
        let f = &cfg.member_fields;

        let mut above_ma = 0usize;
        let mut with_ma = 0usize;
        let mut spreads = Vec::new();
        let mut dollar_volumes = Vec::new();
        let mut pe_weights = Vec::new();

        for member in members {
            let px = data.number(member, &f.px);
            let ma = data.number(member, &f.ma200);
            let volume = data.number(member, &f.volume);
            let shares = data.number(member, &f.shares_out);
            let mcap = data.number(member, &f.mkt_cap);
            let fwd_pe = data.number(member, &f.fwd_pe);

            if is_num(px) && is_num(ma) {
                with_ma += 1;
                if px > ma {
                    above_ma += 1;
                }
            }

            let spread = bps_of_mid(data.number(member, &f.bid), data.number(member, &f.ask));
            if is_num(spread) {
                spreads.push(spread);
            }
            if is_num(px) && is_num(volume) && volume >= 0.0 {
                dollar_volumes.push(px * volume);
            }

            let weight = if is_num(mcap) && mcap > 0.0 {
                mcap
            } else if is_num(shares) && shares > 0.0 && is_num(px) {
                shares * px
            } else {
                continue;
            };
            pe_weights.push((weight, fwd_pe));
        }

        let breadth_pct = if with_ma > 0 {
            above_ma as f64 / with_ma as f64 * 100.0
        } else {
            f64::NAN
        };
        let dollar_volume = if dollar_volumes.is_empty() {
            f64::NAN
        } else {
            dollar_volumes.iter().sum()
        };

        let index_prices = hist.values(&cfg.index.ticker);
        let realized_vol = realized_vol_from_prices(&index_prices, cfg.rv_obs_days, TRADING_DAYS_PER_YEAR);
        let vol_proxy = cfg
            .vol_proxy
            .as_ref()
            .map_or(f64::NAN, |s| data.number(&s.ticker, &s.field));

        let index_fwd_pe = data.number(&cfg.index.ticker, &cfg.index_fwd_pe_field);
        let cap_weighted_fwd_pe = cap_weighted_pe(&pe_weights);
        let ten_year = cfg
            .ten_year
            .as_ref()
            .map_or(f64::NAN, |s| data.number(&s.ticker, &s.field));

        let pe_used = if is_num(index_fwd_pe) && index_fwd_pe > 0.0 {
            index_fwd_pe
        } else {
            cap_weighted_fwd_pe
        };
        let erp_bp = if is_num(pe_used) && pe_used > 0.0 && is_num(ten_year) {
            (100.0 / pe_used - ten_year) * 100.0
        } else {
            f64::NAN
        };

        EquityMetrics {
            universe: members.len(),
            breadth_pct,
            realized_vol,
            vol_proxy,
            dollar_volume,
            median_spread_bps: median(&spreads),
            index_fwd_pe,
            cap_weighted_fwd_pe,
            erp_bp,
            ten_year,
        }
    }

    pub fn render(&self, m: &EquityMetrics, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "\nEquity Market Health Check\n")?;

        writeln!(out, "Breadth")?;
        writeln!(out, "-------")?;
        writeln!(out, "Universe: {} members (sampled)", m.universe)?;
        writeln!(out, "% above 200D MA:           {}", pct_value(m.breadth_pct, 1))?;

        writeln!(out, "\nVolatility")?;
        writeln!(out, "---------")?;
        writeln!(out, "Realized Vol (20D, ann.):  {}", pct_value(m.realized_vol * 100.0, 2))?;
        if let Some(proxy) = &self.config.vol_proxy {
            writeln!(out, "Implied Vol Proxy ({}): {}", proxy.ticker, num(m.vol_proxy, 2))?;
        }

        writeln!(out, "\nLiquidity")?;
        writeln!(out, "---------")?;
        writeln!(out, "Aggregate Dollar Volume:   {} Bn", num(m.dollar_volume / 1e9, 2))?;
        writeln!(out, "Median Bid–Ask (bps mid):  {}", num(m.median_spread_bps, 1))?;

        writeln!(out, "\nValuation")?;
        writeln!(out, "--------")?;
        if is_num(m.index_fwd_pe) {
            writeln!(out, "Index Forward P/E:         {}", num(m.index_fwd_pe, 2))?;
        }
        if is_num(m.cap_weighted_fwd_pe) {
            writeln!(out, "Cap-weighted Fwd P/E:      {}", num(m.cap_weighted_fwd_pe, 2))?;
        }
        if is_num(m.erp_bp) {
            writeln!(out, "Simple ERP vs 10Y:         {} bp", num(m.erp_bp, 0))?;
        }
        if is_num(m.ten_year) {
            writeln!(out, "UST 10Y Yield:             {}%", num(m.ten_year, 2))?;
        }
        Ok(())
    }
}

impl ReportProducer for EquitiesHealthCheck {
    #[instrument(name = "equities_health_check", skip_all)]
    fn run(&self, ctx: &RunContext<'_>, out: &mut dyn Write) -> common::Result<()> {
        let cfg = &self.config;
        let start = ctx.as_of - Duration::days(i64::from(cfg.lookback_days));

        let (members, data, hist) = {
            let mut session = ctx.source.open_session()?;
            let members = self.fetch_members(session.as_mut())?;
            let data = session.reference(&self.build_request(&members))?;
            let hist = session.history(&HistoryRequest::new(
                cfg.index.ticker.as_str(),
                cfg.index.field.as_str(),
                start,
                ctx.as_of,
            ))?;
            (members, data, hist)
        };
        debug!(members = members.len(), "Equity market data received");

        let metrics = self.compute(&members, &data, &hist);
        self.render(&metrics, out)?;
        Ok(())
    }
}
