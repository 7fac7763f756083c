//! Unit conversions for rates, spreads and FX quotes
//!
//! Rates arrive in percent (5.33 means 5.33%). Internally money-market
//! rates are carried as decimals (0.0533) and differences reported in basis
//! points. All helpers propagate NaN.

/// Basis points per unit of decimal rate
pub const BP_PER_UNIT: f64 = 10_000.0;

/// Percent-quoted rate to decimal (5.33 -> 0.0533)
pub fn to_decimal_rate(percent: f64) -> f64 {
    percent / 100.0
}

/// Decimal rate or rate difference to basis points
pub fn bp(decimal: f64) -> f64 {
    decimal * BP_PER_UNIT
}

/// Decimal rate to percent
pub fn pct(decimal: f64) -> f64 {
    decimal * 100.0
}

/// Difference `a - b` of two percent quotes, in basis points
pub fn spread_bp(a_percent: f64, b_percent: f64) -> f64 {
    bp(to_decimal_rate(a_percent) - to_decimal_rate(b_percent))
}

/// Convert a price difference to pips using the pair's quoting convention
///
/// JPY pairs quote a pip at 0.01, other majors at 0.0001.
pub fn to_pips(pair: &str, price_diff: f64) -> f64 {
    if pair.contains("JPY") {
        price_diff * 100.0
    } else {
        price_diff * BP_PER_UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_spread_in_basis_points() {
        assert_abs_diff_eq!(spread_bp(5.33, 5.31), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spread_bp(5.31, 5.33), -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decimal_conversions() {
        assert_abs_diff_eq!(to_decimal_rate(5.33), 0.0533, epsilon = 1e-12);
        assert_abs_diff_eq!(pct(0.0533), 5.33, epsilon = 1e-12);
        assert_abs_diff_eq!(bp(0.0002), 2.0, epsilon = 1e-9);
        assert!(to_decimal_rate(f64::NAN).is_nan());
    }

    #[test]
    fn test_pips() {
        assert_abs_diff_eq!(to_pips("EURUSD", 0.0001), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(to_pips("USDJPY", 0.02), 2.0, epsilon = 1e-9);
    }
}
