//! Request and response types for market data sessions

use crate::value::{is_num, FieldValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point-in-time request: securities, each with its own field list
#[derive(Debug, Clone, Default)]
pub struct ReferenceRequest {
    securities: Vec<(String, Vec<String>)>,
}

impl ReferenceRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fields for a security; repeated calls for the same security merge
    pub fn add<I, S>(&mut self, security: impl Into<String>, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let security = security.into();
        let idx = match self.securities.iter().position(|(s, _)| *s == security) {
            Some(idx) => idx,
            None => {
                self.securities.push((security, Vec::new()));
                self.securities.len() - 1
            }
        };
        let entry = &mut self.securities[idx].1;
        for field in fields {
            let field = field.into();
            if !field.is_empty() && !entry.contains(&field) {
                entry.push(field);
            }
        }
        self
    }

    pub fn securities(&self) -> impl Iterator<Item = &str> {
        self.securities.iter().map(|(s, _)| s.as_str())
    }

    pub fn fields_for(&self, security: &str) -> &[String] {
        self.securities
            .iter()
            .find(|(s, _)| s == security)
            .map(|(_, f)| f.as_slice())
            .unwrap_or(&[])
    }

    /// Union of all requested fields, first-seen order, no duplicates
    pub fn all_fields(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for (_, fields) in &self.securities {
            for f in fields {
                if !out.contains(&f.as_str()) {
                    out.push(f);
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}

/// Point-in-time response: security -> field -> raw value
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    values: HashMap<String, HashMap<String, FieldValue>>,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, security: impl Into<String>, fields: HashMap<String, FieldValue>) {
        self.values.insert(security.into(), fields);
    }

    pub fn get(&self, security: &str, field: &str) -> Option<&FieldValue> {
        self.values.get(security).and_then(|f| f.get(field))
    }

    /// Numeric value of a field, NaN when missing or not numeric
    pub fn number(&self, security: &str, field: &str) -> f64 {
        self.get(security, field)
            .map(FieldValue::as_number)
            .unwrap_or(f64::NAN)
    }

    /// Date value of a field, if present and parseable
    pub fn date(&self, security: &str, field: &str) -> Option<NaiveDate> {
        self.get(security, field).and_then(FieldValue::as_date)
    }

    pub fn contains(&self, security: &str) -> bool {
        self.values.contains_key(security)
    }
}

/// Daily history request for one field
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub securities: Vec<String>,
    pub field: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoryRequest {
    pub fn new(security: impl Into<String>, field: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            securities: vec![security.into()],
            field: field.into(),
            start,
            end,
        }
    }
}

/// One dated observation, value already coerced (NaN when missing)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily history response: security -> observations ordered by date
#[derive(Debug, Clone, Default)]
pub struct HistoricalData {
    series: HashMap<String, Vec<Observation>>,
}

impl HistoricalData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, security: impl Into<String>, observations: Vec<Observation>) {
        self.series.insert(security.into(), observations);
    }

    /// Merge another response in, replacing series for the same security
    pub fn extend(&mut self, other: HistoricalData) {
        self.series.extend(other.series);
    }

    pub fn series(&self, security: &str) -> &[Observation] {
        self.series.get(security).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finite values of a series in date order
    pub fn values(&self, security: &str) -> Vec<f64> {
        self.series(security)
            .iter()
            .map(|o| o.value)
            .filter(|v| is_num(*v))
            .collect()
    }
}
