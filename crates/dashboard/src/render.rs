//! Text and JSON renderers for a dashboard run

use crate::aggregate::{DashboardRun, MarketResult, Status};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::io::{self, Write};

const TEXT_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%SZ";
const JSON_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Prefix every line that has non-whitespace content
fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the human-readable dashboard
///
/// With `quiet_on_success`, the report body of an OK market is left out.
pub fn render_text(run: &DashboardRun, quiet_on_success: bool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Cross-Market Diagnostic Meta-Dashboard ===")?;
    writeln!(out, "Timestamp (UTC): {}", run.timestamp.format(TEXT_TIMESTAMP))?;
    writeln!(out)?;

    for result in &run.results {
        render_market(result, quiet_on_success, out)?;
    }
    Ok(())
}

fn render_market(result: &MarketResult, quiet_on_success: bool, out: &mut dyn Write) -> io::Result<()> {
    let status = result.status();
    writeln!(out, "[{}]  Status: {}", result.title, status)?;

    if let Some(err) = &result.error {
        writeln!(out, "{}", indent(&format!("Error: {}", err), "  "))?;
    }
    if !result.flags.is_empty() {
        writeln!(out, "  Flags:")?;
        for flag in &result.flags {
            writeln!(out, "{}", indent(&format!("- {}", flag), "    "))?;
        }
    }
    if !quiet_on_success || status != Status::Ok {
        writeln!(out, "  --- Report ---")?;
        let report = result.report.trim_end();
        if report.is_empty() {
            writeln!(out, "    (no output captured)")?;
        } else {
            writeln!(out, "{}", indent(report, "    "))?;
        }
    }
    writeln!(out)
}

/// Render the load-failure notice for stderr; nothing when every market loaded
pub fn render_load_failures(run: &DashboardRun, out: &mut dyn Write) -> io::Result<()> {
    if run.load_failures.is_empty() {
        return Ok(());
    }
    writeln!(out, "One or more modules could not be loaded:")?;
    for failure in &run.load_failures {
        writeln!(out, "  - {}: {}", failure.market.title(), failure.message)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    timestamp_utc: String,
    results: JsonResults<'a>,
}

/// Results keyed by market identifier, in selection order
struct JsonResults<'a>(&'a [MarketResult]);

#[derive(Serialize)]
struct JsonMarket<'a> {
    title: &'a str,
    flags: &'a [String],
    error: &'a str,
    report: &'a str,
}

impl Serialize for JsonResults<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for r in self.0 {
            let entry = JsonMarket {
                title: &r.title,
                flags: &r.flags,
                error: r.error.as_deref().unwrap_or(""),
                report: &r.report,
            };
            map.serialize_entry(r.market.as_str(), &entry)?;
        }
        map.end()
    }
}

/// Render the JSON document, pretty-printed with two-space indentation
pub fn render_json(run: &DashboardRun) -> serde_json::Result<String> {
    let doc = JsonDocument {
        timestamp_utc: run.timestamp.format(JSON_TIMESTAMP).to_string(),
        results: JsonResults(&run.results),
    };
    serde_json::to_string_pretty(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::LoadFailure;
    use chrono::{TimeZone, Utc};
    use common::MarketId;

    fn result(market: MarketId, report: &str, flags: &[&str], error: Option<&str>) -> MarketResult {
        MarketResult {
            market,
            title: market.title().to_string(),
            report: report.to_string(),
            flags: flags.iter().map(|f| f.to_string()).collect(),
            error: error.map(str::to_string),
        }
    }

    fn run_of(results: Vec<MarketResult>) -> DashboardRun {
        DashboardRun {
            timestamp: Utc.with_ymd_and_hms(2025, 10, 31, 14, 5, 9).unwrap(),
            results,
            load_failures: Vec::new(),
        }
    }

    fn text(run: &DashboardRun, quiet: bool) -> String {
        let mut buf = Vec::new();
        render_text(run, quiet, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_layout() {
        let run = run_of(vec![
            result(MarketId::Fx, "\nFX Health Check\n\n  EURUSD: 1.08\n\n", &[], None),
            result(
                MarketId::Bonds,
                "Diagnostics / Flags (heuristics)\n- 2s10s inverted (-35.0 bp)\n",
                &["2s10s inverted (-35.0 bp)"],
                None,
            ),
        ]);

        let expected = [
            "",
            "=== Cross-Market Diagnostic Meta-Dashboard ===",
            "Timestamp (UTC): 2025-10-31 14:05:09Z",
            "",
            "[Foreign Exchange (FX)]  Status: OK",
            "  --- Report ---",
            "",
            "    FX Health Check",
            "",
            "      EURUSD: 1.08",
            "",
            "[Bond Markets]  Status: FLAGS",
            "  Flags:",
            "    - 2s10s inverted (-35.0 bp)",
            "  --- Report ---",
            "    Diagnostics / Flags (heuristics)",
            "    - 2s10s inverted (-35.0 bp)",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(text(&run, false), expected);
    }

    #[test]
    fn test_quiet_on_success_hides_only_ok_reports() {
        let run = run_of(vec![
            result(MarketId::Fx, "quiet report", &[], None),
            result(MarketId::Money, "flag report", &["x"], None),
            result(MarketId::Equities, "ERROR during execution: boom\n", &[], Some("boom")),
        ]);
        let out = text(&run, true);
        assert!(!out.contains("quiet report"));
        assert!(out.contains("    flag report"));
        assert!(out.contains("[Equity Markets]  Status: ERROR\n  Error: boom\n  --- Report ---\n"));
    }

    #[test]
    fn test_empty_report_placeholder() {
        let run = run_of(vec![result(
            MarketId::Money,
            "",
            &[],
            Some("no producer registered for market 'Money'"),
        )]);
        let out = text(&run, false);
        assert!(out.contains(
            "[Money Markets]  Status: ERROR\n  Error: no producer registered for market 'Money'\n  --- Report ---\n    (no output captured)\n"
        ));
    }

    #[test]
    fn test_load_failure_notice() {
        let mut run = run_of(vec![]);
        let mut buf = Vec::new();
        render_load_failures(&run, &mut buf).unwrap();
        assert!(buf.is_empty());

        run.load_failures.push(LoadFailure {
            market: MarketId::Money,
            message: "no producer registered for market 'Money'".to_string(),
        });
        render_load_failures(&run, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "One or more modules could not be loaded:\n  - Money Markets: no producer registered for market 'Money'\n"
        );
    }

    #[test]
    fn test_json_document() {
        let run = run_of(vec![
            result(MarketId::Bonds, "b\n", &["flag"], None),
            result(MarketId::Fx, "", &[], Some("boom")),
        ]);
        let json = render_json(&run).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["timestamp_utc"], "2025-10-31T14:05:09.000000Z");
        assert_eq!(value["results"]["Bonds"]["title"], "Bond Markets");
        assert_eq!(value["results"]["Bonds"]["flags"][0], "flag");
        assert_eq!(value["results"]["Bonds"]["error"], "");
        assert_eq!(value["results"]["FX"]["error"], "boom");
        assert!(value["results"]["FX"].get("status").is_none());

        // Selection order is kept
        let bonds_at = json.find("\"Bonds\"").unwrap();
        let fx_at = json.find("\"FX\"").unwrap();
        assert!(bonds_at < fx_at);
        assert!(json.contains("\n  \"results\": {"));
    }

    #[test]
    fn test_json_clean_markets_have_empty_flags_and_error() {
        let run = run_of(vec![
            result(MarketId::Fx, "fx\n", &[], None),
            result(MarketId::Bonds, "bonds\n", &[], None),
        ]);
        let value: serde_json::Value = serde_json::from_str(&render_json(&run).unwrap()).unwrap();

        for market in ["FX", "Bonds"] {
            assert_eq!(value["results"][market]["flags"], serde_json::json!([]));
            assert_eq!(value["results"][market]["error"], "");
        }
        assert_eq!(run.exit_status().code(), 0);
    }
}
