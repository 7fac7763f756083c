//! Field values as delivered by a market data source
//!
//! Vendors deliver numbers, dates and free text through the same field
//! channel, and mark missing data with sentinel tokens instead of nulls.
//! Everything numeric goes through [`to_number`], which never fails: a value
//! that cannot be read as a number becomes NaN.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tokens a source uses for "not available". Matched case-sensitively after trimming.
pub const NA_TOKENS: &[&str] = &["", "N.A.", "NA", "N/A", "—", "-", "NaN"];

/// Date layouts accepted for date-valued fields (e.g. last tradeable date)
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A raw field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Numeric reading of this value, NaN when not available
    pub fn as_number(&self) -> f64 {
        to_number(self)
    }

    /// Date reading of this value, if it is text in one of [`DATE_FORMATS`]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Text(s) => parse_date(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// Coerce a raw field value to f64; NA tokens and malformed text become NaN
pub fn to_number(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Number(v) => *v,
        FieldValue::Text(s) => coerce_text(s),
        FieldValue::Missing => f64::NAN,
    }
}

/// Coerce text to f64 the way vendor strings are read (`"1,234.5"` -> 1234.5)
pub fn coerce_text(raw: &str) -> f64 {
    let s = raw.trim();
    if NA_TOKENS.contains(&s) {
        return f64::NAN;
    }
    s.replace(',', "").parse::<f64>().unwrap_or(f64::NAN)
}

/// True if `x` is a usable number (not NaN, not infinite)
pub fn is_num(x: f64) -> bool {
    x.is_finite()
}

/// Parse a date in any of [`DATE_FORMATS`]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(to_number(&FieldValue::Number(5.33)), 5.33);
        assert_eq!(to_number(&FieldValue::Number(-0.25)), -0.25);
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        assert_eq!(coerce_text("  5.33 "), 5.33);
        assert_eq!(coerce_text("1,234.5"), 1234.5);
        assert_eq!(coerce_text("-12"), -12.0);
        assert!(is_num(coerce_text("0.0001")));
    }

    #[test]
    fn test_na_tokens_become_nan() {
        for token in NA_TOKENS {
            assert!(coerce_text(token).is_nan(), "token {:?}", token);
        }
        assert!(coerce_text("  N.A.  ").is_nan());
        assert!(to_number(&FieldValue::Missing).is_nan());
    }

    #[test]
    fn test_malformed_text_becomes_nan() {
        assert!(coerce_text("abc").is_nan());
        assert!(coerce_text("5.3.3").is_nan());
        assert!(coerce_text("#N/A Field Not Applicable").is_nan());
    }

    #[test]
    fn test_is_num() {
        assert!(is_num(1.0));
        assert!(!is_num(f64::NAN));
        assert!(!is_num(f64::INFINITY));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        assert_eq!(parse_date("2025-11-20"), Some(expected));
        assert_eq!(parse_date("2025/11/20"), Some(expected));
        assert_eq!(parse_date("11/20/2025"), Some(expected));
        assert_eq!(parse_date("20.11.2025"), None);
        assert_eq!(FieldValue::from("2025-11-20").as_date(), Some(expected));
        assert_eq!(FieldValue::Number(20251120.0).as_date(), None);
    }

    #[test]
    fn test_field_value_deserializes_untagged() {
        let values: Vec<FieldValue> = serde_yaml::from_str("[1.5, 3, \"N.A.\", ~]").unwrap();
        assert_eq!(values[0], FieldValue::Number(1.5));
        assert_eq!(values[1], FieldValue::Number(3.0));
        assert_eq!(values[2], FieldValue::Text("N.A.".to_string()));
        assert_eq!(values[3], FieldValue::Missing);
    }
}
