//! Descriptive statistics over market series
//!
//! Inputs may contain NaN for missing observations. Unless stated otherwise
//! the functions drop non-finite values first and return NaN when there is
//! not enough data left.

use crate::units::BP_PER_UNIT;
use crate::value::is_num;
use chrono::NaiveDate;

/// Trading days per year used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| is_num(*v)).collect()
}

/// Population standard deviation; NaN for an empty slice
pub fn pstdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Median of the finite values; NaN when there are none
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = finite(values);
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population stdev of the last `n` finite values
pub fn stdev_last(values: &[f64], n: usize) -> f64 {
    let ys = finite(values);
    if ys.len() < n {
        return f64::NAN;
    }
    let tail = &ys[ys.len() - n..];
    if tail.len() < 2 {
        return f64::NAN;
    }
    pstdev(tail)
}

/// Change between the latest finite value and the one `n - 1` observations earlier
pub fn last_change(values: &[f64], n: usize) -> f64 {
    let ys = finite(values);
    if n == 0 || ys.len() < n {
        return f64::NAN;
    }
    ys[ys.len() - 1] - ys[ys.len() - n]
}

/// Annualized realized volatility (decimal) from the last `obs + 1` prices
pub fn realized_vol_from_prices(prices: &[f64], obs: usize, ann_factor: f64) -> f64 {
    let xs = finite(prices);
    if xs.len() < obs + 1 {
        return f64::NAN;
    }
    let window = &xs[xs.len() - (obs + 1)..];
    let rets: Vec<f64> = window
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[1] > 0.0)
        .map(|w| (w[1] / w[0]).ln())
        .collect();
    if rets.is_empty() {
        return f64::NAN;
    }
    pstdev(&rets) * ann_factor.sqrt()
}

/// Bid-ask spread as basis points of mid
pub fn bps_of_mid(bid: f64, ask: f64) -> f64 {
    if !(is_num(bid) && is_num(ask) && bid > 0.0 && ask > 0.0) {
        return f64::NAN;
    }
    let mid = 0.5 * (bid + ask);
    if mid > 0.0 {
        (ask - bid) / mid * BP_PER_UNIT
    } else {
        f64::NAN
    }
}

/// Annualized roll yield between two futures (decimal)
pub fn annualized_roll(
    front_px: f64,
    next_px: f64,
    front_exp: Option<NaiveDate>,
    next_exp: Option<NaiveDate>,
) -> f64 {
    if !(is_num(front_px) && is_num(next_px) && front_px > 0.0 && next_px > 0.0) {
        return f64::NAN;
    }
    let (Some(d1), Some(d2)) = (front_exp, next_exp) else {
        return f64::NAN;
    };
    let days = (d2 - d1).num_days();
    if days <= 0 {
        return f64::NAN;
    }
    ((next_px / front_px) - 1.0) * (365.0 / days as f64)
}

/// Cap-weighted (harmonic) P/E over `(weight, pe)` pairs with positive P/E
pub fn cap_weighted_pe(pairs: &[(f64, f64)]) -> f64 {
    let usable: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(w, pe)| is_num(*w) && is_num(*pe) && *pe > 0.0)
        .collect();
    if usable.is_empty() {
        return f64::NAN;
    }
    let total_w: f64 = usable.iter().map(|(w, _)| w).sum();
    let denom: f64 = usable.iter().map(|(w, pe)| w / pe).sum();
    if denom > 0.0 {
        total_w / denom
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pstdev() {
        assert_abs_diff_eq!(pstdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0, epsilon = 1e-12);
        assert!(pstdev(&[]).is_nan());
    }

    #[test]
    fn test_median_skips_nan() {
        assert_eq!(median(&[3.0, f64::NAN, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[f64::NAN]).is_nan());
    }

    #[test]
    fn test_stdev_last_requires_window() {
        let xs: Vec<f64> = (0..19).map(|i| i as f64).collect();
        assert!(stdev_last(&xs, 20).is_nan());

        let xs: Vec<f64> = (0..25).map(|i| (i % 2) as f64).collect();
        assert_abs_diff_eq!(stdev_last(&xs, 20), 0.5, epsilon = 1e-12);
        assert!(stdev_last(&[1.0], 1).is_nan());
    }

    #[test]
    fn test_last_change() {
        let xs: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        // last = 129, 20th from the end = 110
        assert_abs_diff_eq!(last_change(&xs, 20), 19.0, epsilon = 1e-12);
        assert!(last_change(&xs[..5], 20).is_nan());
    }

    #[test]
    fn test_realized_vol_constant_growth_is_zero() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        assert_abs_diff_eq!(realized_vol_from_prices(&prices, 20, TRADING_DAYS_PER_YEAR), 0.0, epsilon = 1e-9);
        assert!(realized_vol_from_prices(&prices[..10], 20, TRADING_DAYS_PER_YEAR).is_nan());
    }

    #[test]
    fn test_realized_vol_alternating_returns() {
        let mut prices = vec![100.0];
        for i in 0..20 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last * 1.01 } else { last / 1.01 });
        }
        let expected = 1.01_f64.ln() * TRADING_DAYS_PER_YEAR.sqrt();
        assert_abs_diff_eq!(realized_vol_from_prices(&prices, 20, TRADING_DAYS_PER_YEAR), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_bps_of_mid() {
        assert_abs_diff_eq!(bps_of_mid(99.0, 101.0), 200.0, epsilon = 1e-9);
        assert!(bps_of_mid(0.0, 101.0).is_nan());
        assert!(bps_of_mid(f64::NAN, 101.0).is_nan());
    }

    #[test]
    fn test_annualized_roll() {
        let d1 = NaiveDate::from_ymd_opt(2025, 11, 20);
        let d2 = NaiveDate::from_ymd_opt(2025, 12, 20);
        let roll = annualized_roll(100.0, 101.0, d1, d2);
        assert_abs_diff_eq!(roll, 0.01 * 365.0 / 30.0, epsilon = 1e-12);
        assert!(annualized_roll(100.0, 101.0, d2, d1).is_nan());
        assert!(annualized_roll(100.0, 101.0, None, d2).is_nan());
    }

    #[test]
    fn test_cap_weighted_pe() {
        // Harmonic mean weighted by cap: (100 + 100) / (100/10 + 100/20)
        let pe = cap_weighted_pe(&[(100.0, 10.0), (100.0, 20.0), (50.0, f64::NAN)]);
        assert_abs_diff_eq!(pe, 200.0 / 15.0, epsilon = 1e-9);
        assert!(cap_weighted_pe(&[(100.0, -5.0)]).is_nan());
    }
}
