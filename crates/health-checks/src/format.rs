//! Number formatting shared by the report producers
//!
//! Missing values (NaN, infinite) always render as an em dash.

use market_data::is_num;
use market_data::units::{bp, pct};

pub const MISSING: &str = "—";

/// `x` with `nd` decimals
pub fn num(x: f64, nd: usize) -> String {
    if is_num(x) {
        format!("{:.*}", nd, x)
    } else {
        MISSING.to_string()
    }
}

/// Decimal rate as percent with `nd` decimals (0.0533 -> "5.3300%")
pub fn pct_of_decimal(x: f64, nd: usize) -> String {
    if is_num(x) {
        format!("{:.*}%", nd, pct(x))
    } else {
        MISSING.to_string()
    }
}

/// Value already in percent, with a percent sign
pub fn pct_value(x: f64, nd: usize) -> String {
    if is_num(x) {
        format!("{:.*}%", nd, x)
    } else {
        MISSING.to_string()
    }
}

/// Decimal rate difference in basis points, one decimal (0.0007 -> "7.0 bp")
pub fn bp_of_decimal(x: f64) -> String {
    if is_num(x) {
        format!("{:.1} bp", bp(x))
    } else {
        MISSING.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_render_as_dash() {
        assert_eq!(num(f64::NAN, 2), "—");
        assert_eq!(pct_of_decimal(f64::INFINITY, 4), "—");
        assert_eq!(pct_value(f64::NAN, 1), "—");
        assert_eq!(bp_of_decimal(f64::NAN), "—");
    }

    #[test]
    fn test_formats() {
        assert_eq!(num(1.084_15, 6), "1.084150");
        assert_eq!(num(1234.5, 0), "1234");
        assert_eq!(pct_of_decimal(0.0533, 4), "5.3300%");
        assert_eq!(pct_value(62.5, 1), "62.5%");
        assert_eq!(bp_of_decimal(0.0007), "7.0 bp");
        assert_eq!(bp_of_decimal(-0.0002), "-2.0 bp");
    }
}
