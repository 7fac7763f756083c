//! Futures & options health check
//!
//! Per underlying: contract table, roll yield, curve slope, basis to spot,
//! liquidity totals, optional option-surface levels and put/call activity,
//! and a diagnostics block only when something is flagged.

use crate::format::{num, pct_of_decimal, MISSING};
use chrono::NaiveDate;
use config::{FuturesOptionsConfig, UnderlyingConfig};
use dashboard::{ReportProducer, RunContext};
use market_data::stats::{annualized_roll, bps_of_mid, median};
use market_data::{is_num, ReferenceData, ReferenceRequest};
use std::io::Write;
use tracing::{debug, instrument};

const TENOR_PLACEHOLDER: &str = "{tenor}";

fn pct2(x: f64) -> String {
    pct_of_decimal(x, 2)
}

fn expand(template: &str, tenor: &str) -> String {
    template.replace(TENOR_PLACEHOLDER, tenor)
}

#[derive(Debug, Clone)]
pub struct ContractRow {
    pub ticker: String,
    pub last: f64,
    pub bid: f64,
    pub ask: f64,
    pub spread_bps: f64,
    pub volume: f64,
    pub open_interest: f64,
    pub expiry: Option<NaiveDate>,
}

/// Surface levels for one option tenor
#[derive(Debug, Clone)]
pub struct SurfacePoint {
    pub tenor: String,
    pub atm: f64,
    pub rr25: f64,
    pub bf25: f64,
}

#[derive(Debug, Clone)]
pub struct OptionActivity {
    pub calls_volume: f64,
    pub puts_volume: f64,
    pub put_call_ratio: f64,
}

#[derive(Debug, Clone)]
pub struct UnderlyingMetrics {
    pub name: String,
    pub contracts: Vec<String>,
    pub spot_ticker: Option<String>,
    pub rows: Vec<ContractRow>,
    /// Front vs spot, decimal
    pub basis: f64,
    /// Annualized front-to-next roll, decimal
    pub roll: f64,
    /// Back over front minus one, decimal
    pub curve_slope: f64,
    pub total_open_interest: f64,
    pub total_volume: f64,
    pub median_spread_bps: f64,
    /// Empty when no template is configured
    pub surface: Vec<SurfacePoint>,
    pub activity: Option<OptionActivity>,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FuturesOptionsHealthCheck {
    config: FuturesOptionsConfig,
}

impl FuturesOptionsHealthCheck {
    pub fn new(config: FuturesOptionsConfig) -> Self {
        Self { config }
    }

    /// Security carrying the option surface fields
    fn surface_target<'a>(&self, u: &'a UnderlyingConfig) -> Option<&'a str> {
        u.surface_ticker
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| u.contracts.first().map(String::as_str))
    }

    /// (tenor, atm, rr25, bf25) field names, absent templates as `None`
    fn surface_fields(&self) -> Vec<(&str, Option<String>, Option<String>, Option<String>)> {
        let cfg = &self.config;
        cfg.option_tenors
            .iter()
            .map(|t| {
                (
                    t.as_str(),
                    cfg.atm_template.as_deref().map(|tpl| expand(tpl, t)),
                    cfg.rr25_template.as_deref().map(|tpl| expand(tpl, t)),
                    cfg.bf25_template.as_deref().map(|tpl| expand(tpl, t)),
                )
            })
            .collect()
    }

    pub fn build_request(&self) -> ReferenceRequest {
        let cfg = &self.config;
        let mut req = ReferenceRequest::new();
        for u in &cfg.underlyings {
            for contract in &u.contracts {
                req.add(contract.as_str(), cfg.contract_fields.all());
            }
            if let Some(spot) = u.spot.as_deref().filter(|s| !s.is_empty()) {
                req.add(spot, [cfg.spot_field.as_str()]);
            }
            if cfg.has_option_templates() {
                if let Some(target) = self.surface_target(u) {
                    let fields = self
                        .surface_fields()
                        .into_iter()
                        .flat_map(|(_, atm, rr, bf)| [atm, rr, bf])
                        .flatten();
                    req.add(target, fields);
                }
            }
            for option in u.calls.iter().chain(&u.puts) {
                req.add(option.as_str(), [cfg.option_volume_field.as_str()]);
            }
        }
        req
    }

    pub fn compute(&self, data: &ReferenceData) -> Vec<UnderlyingMetrics> {
        self.config
            .underlyings
            .iter()
            .map(|u| self.compute_underlying(u, data))
            .collect()
    }

    fn compute_underlying(&self, u: &UnderlyingConfig, data: &ReferenceData) -> UnderlyingMetrics {
        let cfg = &self.config;
        let f = &cfg.contract_fields;

        let rows: Vec<ContractRow> = u
            .contracts
            .iter()
            .map(|c| {
                let bid = data.number(c, &f.bid);
                let ask = data.number(c, &f.ask);
                ContractRow {
                    ticker: c.clone(),
                    last: data.number(c, &f.last),
                    bid,
                    ask,
                    spread_bps: bps_of_mid(bid, ask),
                    volume: data.number(c, &f.volume),
                    open_interest: data.number(c, &f.open_interest),
                    expiry: data.date(c, &f.expiry),
                }
            })
            .collect();

        let front = rows.first().map_or(f64::NAN, |r| r.last);
        let spot_ticker = u.spot.clone().filter(|s| !s.is_empty());
        let basis = match &spot_ticker {
            Some(spot) => {
                let spot_px = data.number(spot, &cfg.spot_field);
                if is_num(spot_px) && spot_px != 0.0 {
                    (front - spot_px) / spot_px
                } else {
                    f64::NAN
                }
            }
            None => f64::NAN,
        };

        let roll = match rows.as_slice() {
            [first, second, ..] => annualized_roll(first.last, second.last, first.expiry, second.expiry),
            _ => f64::NAN,
        };
        let curve_slope = match rows.as_slice() {
            [first, _, .., last] if front != 0.0 => last.last / first.last - 1.0,
            _ => f64::NAN,
        };

        let total_open_interest: f64 = rows.iter().map(|r| r.open_interest).filter(|x| is_num(*x)).sum();
        let total_volume: f64 = rows.iter().map(|r| r.volume).filter(|x| is_num(*x)).sum();
        let spreads: Vec<f64> = rows.iter().map(|r| r.spread_bps).collect();

        let surface = self.surface(u, data);
        let activity = self.activity(u, data);
        let flags = self.flags(&rows);

        UnderlyingMetrics {
            name: u.name.clone(),
            contracts: u.contracts.clone(),
            spot_ticker,
            basis,
            roll,
            curve_slope,
            total_open_interest,
            total_volume,
            median_spread_bps: median(&spreads),
            surface,
            activity,
            flags,
            rows,
        }
    }

    fn surface(&self, u: &UnderlyingConfig, data: &ReferenceData) -> Vec<SurfacePoint> {
        if !self.config.has_option_templates() {
            return Vec::new();
        }
        let Some(target) = self.surface_target(u) else {
            return Vec::new();
        };
        let level = |field: &Option<String>| field.as_deref().map_or(f64::NAN, |fld| data.number(target, fld));
        self.surface_fields()
            .iter()
            .map(|(tenor, atm, rr, bf)| SurfacePoint {
                tenor: tenor.to_string(),
                atm: level(atm),
                rr25: level(rr),
                bf25: level(bf),
            })
            .collect()
    }

    fn activity(&self, u: &UnderlyingConfig, data: &ReferenceData) -> Option<OptionActivity> {
        if u.calls.is_empty() && u.puts.is_empty() {
            return None;
        }
        let field = &self.config.option_volume_field;
        // A missing field counts as zero volume, an NA value poisons the sum
        let total = |tickers: &[String]| -> f64 {
            tickers
                .iter()
                .map(|t| data.get(t, field).map_or(0.0, |v| v.as_number()))
                .sum()
        };
        let calls_volume = total(&u.calls);
        let puts_volume = total(&u.puts);
        let put_call_ratio = if is_num(calls_volume) && calls_volume != 0.0 {
            puts_volume / calls_volume
        } else {
            f64::NAN
        };
        Some(OptionActivity {
            calls_volume,
            puts_volume,
            put_call_ratio,
        })
    }

    pub fn flags(&self, rows: &[ContractRow]) -> Vec<String> {
        let t = &self.config.thresholds;
        let mut flags = Vec::new();

        if let [first, second, ..] = rows {
            if is_num(first.last) && is_num(second.last) && first.last != 0.0 {
                let slope_bp = (second.last - first.last) / first.last * 1e4;
                if slope_bp > t.contango_bp {
                    flags.push(format!("Notable contango front→next ({:.0} bp of front)", slope_bp));
                }
                if slope_bp < t.backwardation_bp {
                    flags.push(format!("Notable backwardation front→next ({:.0} bp of front)", slope_bp));
                }
            }
        }

        let tickers = |pred: &dyn Fn(&ContractRow) -> bool| {
            rows.iter()
                .filter(|r| pred(r))
                .map(|r| r.ticker.as_str())
                .collect::<Vec<_>>()
        };
        let low_oi = tickers(&|r| is_num(r.open_interest) && r.open_interest < t.low_open_interest);
        let wide = tickers(&|r| is_num(r.spread_bps) && r.spread_bps > t.wide_spread_bps);
        if !low_oi.is_empty() {
            flags.push(format!("Low OI: {}", low_oi.join(", ")));
        }
        if !wide.is_empty() {
            flags.push(format!("Wide spreads: {}", wide.join(", ")));
        }
        flags
    }

    pub fn render(&self, underlyings: &[UnderlyingMetrics], out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "\nFutures & Options Market Health Check\n")?;
        for m in underlyings {
            render_underlying(m, out)?;
        }
        Ok(())
    }
}

fn render_underlying(m: &UnderlyingMetrics, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{}  [{}]", m.name, m.contracts.join(", "))?;
    writeln!(out, "{}", "-".repeat((m.name.chars().count() + 8).max(20)))?;
    writeln!(out, "Contracts (px / spr bps / OI / Vol / Exp)")?;
    for r in &m.rows {
        let expiry = r
            .expiry
            .map_or_else(|| MISSING.to_string(), |d| d.format("%Y-%m-%d").to_string());
        writeln!(
            out,
            "  {:<15} px {:>8}  spr {:>6}  OI {:>8}  Vol {:>8}  Exp {}",
            r.ticker,
            num(r.last, 4),
            num(r.spread_bps, 1),
            num(r.open_interest, 0),
            num(r.volume, 0),
            expiry
        )?;
    }
    writeln!(out, "Front→Next annualized roll:   {}", pct2(m.roll))?;
    writeln!(out, "Curve slope (front→back):     {}", pct2(m.curve_slope))?;
    if let Some(spot) = &m.spot_ticker {
        writeln!(out, "Basis vs spot ({}):    {}", spot, pct2(m.basis))?;
    }
    writeln!(
        out,
        "Liquidity: Total OI {}, Total Vol {}, Median spr {} bps",
        num(m.total_open_interest, 0),
        num(m.total_volume, 0),
        num(m.median_spread_bps, 1)
    )?;
    writeln!(out)?;

    if m.surface.iter().any(|p| is_num(p.atm) || is_num(p.rr25) || is_num(p.bf25)) {
        writeln!(out, "Options on Futures (IV/Skew)")?;
        for p in &m.surface {
            writeln!(
                out,
                "  {:<3} ATM IV {:>6}   25Δ RR {:>6}   25Δ BF {:>6}",
                p.tenor,
                num(p.atm, 2),
                num(p.rr25, 2),
                num(p.bf25, 2)
            )?;
        }
        writeln!(out)?;
    }

    if let Some(a) = &m.activity {
        writeln!(out, "Option Activity")?;
        writeln!(
            out,
            "  Calls Vol (Σ): {}   Puts Vol (Σ): {}   Put/Call Ratio: {}",
            num(a.calls_volume, 0),
            num(a.puts_volume, 0),
            num(a.put_call_ratio, 2)
        )?;
        writeln!(out)?;
    }

    if !m.flags.is_empty() {
        writeln!(out, "Diagnostics / Flags")?;
        for flag in &m.flags {
            writeln!(out, "  - {}", flag)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

impl ReportProducer for FuturesOptionsHealthCheck {
    #[instrument(name = "futures_options_health_check", skip_all)]
    fn run(&self, ctx: &RunContext<'_>, out: &mut dyn Write) -> common::Result<()> {
        let request = self.build_request();
        let data = {
            let mut session = ctx.source.open_session()?;
            session.reference(&request)?
        };
        debug!(securities = request.len(), "Futures & options reference data received");

        let metrics = self.compute(&data);
        self.render(&metrics, out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use market_data::{MarketSnapshot, SnapshotSource};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 31).unwrap()
    }

    fn wti_only() -> FuturesOptionsConfig {
        FuturesOptionsConfig {
            underlyings: vec![UnderlyingConfig::new(
                "WTI",
                &["CLX5 Comdty", "CLZ5 Comdty", "CLF6 Comdty"],
                Some("USOILSP Index"),
            )],
            ..FuturesOptionsConfig::default()
        }
    }

    fn contract(s: MarketSnapshot, tkr: &str, px: f64, oi: f64, exp: &str) -> MarketSnapshot {
        s.with_field(tkr, "PX_LAST", px)
            .with_field(tkr, "BID", px - 0.01)
            .with_field(tkr, "ASK", px + 0.01)
            .with_field(tkr, "PX_VOLUME", 250_000.0)
            .with_field(tkr, "OPEN_INT", oi)
            .with_field(tkr, "LAST_TRADEABLE_DT", exp)
    }

    fn contango_curve() -> MarketSnapshot {
        let s = MarketSnapshot::new().with_field("USOILSP Index", "PX_LAST", 60.0);
        let s = contract(s, "CLX5 Comdty", 60.0, 300_000.0, "2025-11-20");
        let s = contract(s, "CLZ5 Comdty", 60.6, 250_000.0, "2025-12-20");
        contract(s, "CLF6 Comdty", 61.2, 500.0, "2026-01-20")
    }

    fn run(check: &FuturesOptionsHealthCheck, snapshot: MarketSnapshot) -> String {
        let source = SnapshotSource::in_memory(snapshot);
        let ctx = RunContext::new(&source, as_of());
        let mut buf = Vec::new();
        check.run(&ctx, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_contango_and_low_oi_flags() {
        let report = run(&FuturesOptionsHealthCheck::new(wti_only()), contango_curve());

        assert!(report.starts_with(
            "\nFutures & Options Market Health Check\n\nWTI  [CLX5 Comdty, CLZ5 Comdty, CLF6 Comdty]\n--------------------\n"
        ));
        assert!(report.contains("  CLX5 Comdty     px  60.0000  spr    3.3  OI   300000  Vol   250000  Exp 2025-11-20\n"));
        // 1% over 30 days
        assert!(report.contains("Front→Next annualized roll:   12.17%\n"));
        assert!(report.contains("Curve slope (front→back):     2.00%\n"));
        assert!(report.contains("Basis vs spot (USOILSP Index):    0.00%\n"));
        assert!(report.contains("Liquidity: Total OI 550500, Total Vol 750000, Median spr 3.3 bps\n"));

        assert_eq!(
            dashboard::extract_flags(&report),
            vec!["Notable contango front→next (100 bp of front)", "Low OI: CLF6 Comdty"]
        );
        assert!(report.ends_with("Diagnostics / Flags\n  - Notable contango front→next (100 bp of front)\n  - Low OI: CLF6 Comdty\n\n"));
    }

    #[test]
    fn test_flat_curve_has_no_diagnostics() {
        let s = MarketSnapshot::new();
        let s = contract(s, "CLX5 Comdty", 60.0, 300_000.0, "2025-11-20");
        let s = contract(s, "CLZ5 Comdty", 60.1, 250_000.0, "2025-12-20");
        let report = run(&FuturesOptionsHealthCheck::new(wti_only()), s);

        assert!(!report.contains("Diagnostics"));
        // Spot ticker configured but missing from the data
        assert!(report.contains("Basis vs spot (USOILSP Index):    —\n"));
        // Third contract absent: slope still needs three rows and the back one is NaN
        assert!(report.contains("Curve slope (front→back):     —\n"));
        assert!(report.contains("  CLF6 Comdty     px        —  spr      —  OI        —  Vol        —  Exp —\n"));
    }

    #[test]
    fn test_backwardation_and_wide_spreads() {
        let check = FuturesOptionsHealthCheck::new(wti_only());
        let rows = vec![
            ContractRow {
                ticker: "A".to_string(),
                last: 100.0,
                bid: 99.0,
                ask: 101.0,
                spread_bps: 200.0,
                volume: 1.0,
                open_interest: 5_000.0,
                expiry: None,
            },
            ContractRow {
                ticker: "B".to_string(),
                last: 98.0,
                bid: f64::NAN,
                ask: f64::NAN,
                spread_bps: f64::NAN,
                volume: 1.0,
                open_interest: f64::NAN,
                expiry: None,
            },
        ];
        assert_eq!(
            check.flags(&rows),
            vec!["Notable backwardation front→next (-200 bp of front)", "Wide spreads: A"]
        );
    }

    #[test]
    fn test_option_surface_and_activity() {
        let mut cfg = wti_only();
        cfg.atm_template = Some("{tenor}_ATM_IMP_VOL".to_string());
        cfg.rr25_template = Some("{tenor}_25D_RR".to_string());
        cfg.underlyings[0].calls = vec!["CLZ5C 70 Comdty".to_string()];
        cfg.underlyings[0].puts = vec!["CLZ5P 55 Comdty".to_string(), "CLZ5P 50 Comdty".to_string()];
        let check = FuturesOptionsHealthCheck::new(cfg);

        let req = check.build_request();
        assert_eq!(
            req.fields_for("CLX5 Comdty")[6..],
            ["1M_ATM_IMP_VOL", "1M_25D_RR", "3M_ATM_IMP_VOL", "3M_25D_RR"]
        );

        let snap = contango_curve()
            .with_field("CLX5 Comdty", "1M_ATM_IMP_VOL", 32.5)
            .with_field("CLZ5C 70 Comdty", "PX_VOLUME", 1_000.0)
            .with_field("CLZ5P 55 Comdty", "PX_VOLUME", 600.0)
            .with_field("CLZ5P 50 Comdty", "PX_VOLUME", 650.0);
        let report = run(&check, snap);

        assert!(report.contains(
            "Options on Futures (IV/Skew)\n  1M  ATM IV  32.50   25Δ RR      —   25Δ BF      —\n  3M  ATM IV      —   25Δ RR      —   25Δ BF      —\n\n"
        ));
        assert!(report.contains(
            "Option Activity\n  Calls Vol (Σ): 1000   Puts Vol (Σ): 1250   Put/Call Ratio: 1.25\n\n"
        ));
    }

    #[test]
    fn test_roll_uses_expiries() {
        let check = FuturesOptionsHealthCheck::new(wti_only());
        let source = SnapshotSource::in_memory(contango_curve());
        let data = {
            use market_data::DataSource;
            let mut session = source.open_session().unwrap();
            session.reference(&check.build_request()).unwrap()
        };
        let metrics = check.compute(&data);
        assert_abs_diff_eq!(metrics[0].roll, 0.01 * 365.0 / 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics[0].basis, 0.0, epsilon = 1e-12);
    }
}
