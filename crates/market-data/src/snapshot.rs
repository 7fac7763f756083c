//! File-backed market data source
//!
//! A snapshot file stands in for a live terminal session. It holds
//! point-in-time fields, daily histories and bulk tables:
//!
//! ```yaml
//! reference:
//!   "EURUSD Curncy": { BID: 1.0841, ASK: 1.0842, PX_LAST: 1.08415 }
//!   "FEDL01 Index": { PX_LAST: "N.A." }
//! history:
//!   "FEDL01 Index":
//!     PX_LAST:
//!       - { date: 2025-10-01, value: 5.33 }
//! bulk:
//!   "SPX Index":
//!     INDX_MEMBERS: ["AAPL UW", "MSFT UW"]
//! ```
//!
//! JSON snapshots are read by the same parser.

use crate::error::MarketDataError;
use crate::source::{DataSource, Session};
use crate::types::{HistoricalData, HistoryRequest, Observation, ReferenceData, ReferenceRequest};
use crate::value::{to_number, FieldValue};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One stored history point, value still raw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPoint {
    pub date: NaiveDate,
    pub value: FieldValue,
}

/// Contents of a snapshot file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub reference: HashMap<String, HashMap<String, FieldValue>>,
    #[serde(default)]
    pub history: HashMap<String, HashMap<String, Vec<SnapshotPoint>>>,
    #[serde(default)]
    pub bulk: HashMap<String, HashMap<String, Vec<String>>>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse snapshot text (YAML or JSON)
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| MarketDataError::Session(format!("invalid snapshot: {}", e)))
    }

    /// Set a point-in-time field
    pub fn with_field(mut self, security: &str, field: &str, value: impl Into<FieldValue>) -> Self {
        self.reference
            .entry(security.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
        self
    }

    /// Set a daily history
    pub fn with_history(mut self, security: &str, field: &str, points: Vec<(NaiveDate, FieldValue)>) -> Self {
        let points = points
            .into_iter()
            .map(|(date, value)| SnapshotPoint { date, value })
            .collect();
        self.history
            .entry(security.to_string())
            .or_default()
            .insert(field.to_string(), points);
        self
    }

    /// Set a bulk table
    pub fn with_bulk(mut self, security: &str, field: &str, rows: Vec<String>) -> Self {
        self.bulk
            .entry(security.to_string())
            .or_default()
            .insert(field.to_string(), rows);
        self
    }
}

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Memory(MarketSnapshot),
}

/// Data source backed by a snapshot file or an in-memory snapshot
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    origin: Origin,
}

impl SnapshotSource {
    /// Source reading `path` each time a session is opened
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::File(path.into()),
        }
    }

    /// Source serving a fixed in-memory snapshot
    pub fn in_memory(snapshot: MarketSnapshot) -> Self {
        Self {
            origin: Origin::Memory(snapshot),
        }
    }

    fn load(path: &Path) -> Result<MarketSnapshot> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MarketDataError::Session(format!("cannot read snapshot {:?}: {}", path, e)))?;
        debug!(path = ?path, bytes = content.len(), "Snapshot file read");
        MarketSnapshot::parse(&content)
    }
}

impl DataSource for SnapshotSource {
    fn describe(&self) -> String {
        match &self.origin {
            Origin::File(path) => format!("snapshot file {:?}", path),
            Origin::Memory(_) => "in-memory snapshot".to_string(),
        }
    }

    fn open_session(&self) -> Result<Box<dyn Session + '_>> {
        let snapshot = match &self.origin {
            Origin::File(path) => Cow::Owned(Self::load(path)?),
            Origin::Memory(snapshot) => Cow::Borrowed(snapshot),
        };
        info!(source = %self.describe(), "Market data session started");
        Ok(Box::new(SnapshotSession {
            snapshot,
            label: self.describe(),
        }))
    }
}

/// Session over a loaded snapshot
struct SnapshotSession<'a> {
    snapshot: Cow<'a, MarketSnapshot>,
    label: String,
}

impl Session for SnapshotSession<'_> {
    fn reference(&mut self, request: &ReferenceRequest) -> Result<ReferenceData> {
        debug!(
            securities = request.len(),
            fields = request.all_fields().len(),
            "Reference request"
        );
        let mut out = ReferenceData::new();
        for security in request.securities() {
            let stored = self.snapshot.reference.get(security);
            let fields: HashMap<String, FieldValue> = request
                .fields_for(security)
                .iter()
                .filter_map(|f| stored.and_then(|s| s.get(f)).map(|v| (f.clone(), v.clone())))
                .collect();
            out.insert(security, fields);
        }
        Ok(out)
    }

    fn history(&mut self, request: &HistoryRequest) -> Result<HistoricalData> {
        if request.start > request.end {
            return Err(MarketDataError::Request(format!(
                "history start {} is after end {}",
                request.start, request.end
            )));
        }
        debug!(
            securities = ?request.securities,
            field = %request.field,
            start = %request.start,
            end = %request.end,
            "History request"
        );
        let mut out = HistoricalData::new();
        for security in &request.securities {
            let Some(points) = self
                .snapshot
                .history
                .get(security)
                .and_then(|f| f.get(&request.field))
            else {
                continue;
            };
            let mut observations: Vec<Observation> = points
                .iter()
                .filter(|p| p.date >= request.start && p.date <= request.end)
                .map(|p| Observation {
                    date: p.date,
                    value: to_number(&p.value),
                })
                .collect();
            observations.sort_by_key(|o| o.date);
            out.insert(security.clone(), observations);
        }
        Ok(out)
    }

    fn bulk_members(&mut self, security: &str, field: &str, max_members: usize) -> Result<Vec<String>> {
        let rows = self
            .snapshot
            .bulk
            .get(security)
            .and_then(|f| f.get(field))
            .map(|rows| rows.iter().take(max_members).cloned().collect())
            .unwrap_or_default();
        Ok(rows)
    }
}

impl Drop for SnapshotSession<'_> {
    fn drop(&mut self) {
        debug!(source = %self.label, "Market data session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    const SNAPSHOT: &str = r#"
reference:
  "EURUSD Curncy": { BID: 1.0841, ASK: "1,0842", PX_LAST: "N.A." }
history:
  "FEDL01 Index":
    PX_LAST:
      - { date: 2025-10-03, value: 5.33 }
      - { date: 2025-10-01, value: 5.32 }
      - { date: 2025-10-02, value: "N.A." }
      - { date: 2025-09-01, value: 5.50 }
bulk:
  "SPX Index":
    INDX_MEMBERS: ["AAPL UW", "MSFT UW", "NVDA UW"]
"#;

    #[test]
    fn test_reference_returns_only_requested_fields() {
        let source = SnapshotSource::in_memory(MarketSnapshot::parse(SNAPSHOT).unwrap());
        let mut session = source.open_session().unwrap();

        let mut req = ReferenceRequest::new();
        req.add("EURUSD Curncy", ["BID", "PX_LAST"]).add("GBPUSD Curncy", ["BID"]);
        let data = session.reference(&req).unwrap();

        assert_eq!(data.number("EURUSD Curncy", "BID"), 1.0841);
        assert!(data.number("EURUSD Curncy", "PX_LAST").is_nan());
        assert!(data.get("EURUSD Curncy", "ASK").is_none());
        assert!(data.contains("GBPUSD Curncy"));
    }

    #[test]
    fn test_history_is_windowed_sorted_and_coerced() {
        let source = SnapshotSource::in_memory(MarketSnapshot::parse(SNAPSHOT).unwrap());
        let mut session = source.open_session().unwrap();

        let req = HistoryRequest::new("FEDL01 Index", "PX_LAST", d(9, 15), d(10, 31));
        let hist = session.history(&req).unwrap();
        let series = hist.series("FEDL01 Index");

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, d(10, 1));
        assert!(series[1].value.is_nan());
        assert_eq!(hist.values("FEDL01 Index"), vec![5.32, 5.33]);
    }

    #[test]
    fn test_history_rejects_inverted_window() {
        let source = SnapshotSource::in_memory(MarketSnapshot::new());
        let mut session = source.open_session().unwrap();
        let req = HistoryRequest::new("FEDL01 Index", "PX_LAST", d(10, 31), d(10, 1));
        assert_matches!(session.history(&req), Err(MarketDataError::Request(_)));
    }

    #[test]
    fn test_bulk_members_truncated() {
        let source = SnapshotSource::in_memory(MarketSnapshot::parse(SNAPSHOT).unwrap());
        let mut session = source.open_session().unwrap();
        let members = session.bulk_members("SPX Index", "INDX_MEMBERS", 2).unwrap();
        assert_eq!(members, vec!["AAPL UW", "MSFT UW"]);
        assert!(session.bulk_members("NDX Index", "INDX_MEMBERS", 10).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_fails_to_start_session() {
        let source = SnapshotSource::from_path("/nonexistent/snapshot.yaml");
        let err = source.open_session().err().unwrap();
        assert_matches!(err, MarketDataError::Session(_));
        assert!(err.to_string().starts_with("failed to start market data session"));
    }

    #[test]
    fn test_file_source_reads_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, SNAPSHOT.as_bytes()).unwrap();

        let source = SnapshotSource::from_path(file.path());
        let mut session = source.open_session().unwrap();
        let mut req = ReferenceRequest::new();
        req.add("EURUSD Curncy", ["BID"]);
        assert_eq!(session.reference(&req).unwrap().number("EURUSD Curncy", "BID"), 1.0841);
    }

    #[test]
    fn test_builder_helpers() {
        let snap = MarketSnapshot::new()
            .with_field("SPX Index", "PX_LAST", 5000.0)
            .with_history("SPX Index", "PX_LAST", vec![(d(10, 1), FieldValue::Number(4990.0))])
            .with_bulk("SPX Index", "INDX_MEMBERS", vec!["AAPL UW".to_string()]);
        assert_eq!(snap.reference["SPX Index"]["PX_LAST"], FieldValue::Number(5000.0));
        assert_eq!(snap.history["SPX Index"]["PX_LAST"].len(), 1);
        assert_eq!(snap.bulk["SPX Index"]["INDX_MEMBERS"].len(), 1);
    }
}
