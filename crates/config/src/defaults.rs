use super::{SeriesRef, UnderlyingConfig};
use std::path::PathBuf;

pub fn default_enabled() -> bool {
    true
}

pub fn default_snapshot_path() -> PathBuf {
    PathBuf::from("snapshot.yaml")
}

pub fn default_px_field() -> String {
    "PX_LAST".to_string()
}

pub fn default_bid_field() -> String {
    "BID".to_string()
}

pub fn default_ask_field() -> String {
    "ASK".to_string()
}

pub fn default_volume_field() -> String {
    "VOLUME".to_string()
}

pub fn default_obs_days() -> usize {
    20
}

// === FX ===

pub fn default_fx_pairs() -> Vec<String> {
    ["EURUSD", "USDJPY", "GBPUSD", "AUDUSD", "USDCHF", "USDCAD"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

pub fn default_fx_vol_tenors() -> Vec<String> {
    vec!["1M".to_string(), "3M".to_string()]
}

pub fn default_fx_realized_tenors() -> Vec<String> {
    vec!["1M".to_string(), "3M".to_string()]
}

// === Money markets ===

pub fn default_effr() -> SeriesRef {
    SeriesRef::px_last("FEDL01 Index")
}

pub fn default_band_upper() -> SeriesRef {
    SeriesRef::px_last("FDTR Index")
}

pub fn default_band_lower() -> SeriesRef {
    SeriesRef::px_last("FDTRFTRL Index")
}

pub fn default_sofr() -> SeriesRef {
    SeriesRef::px_last("SOFRRATE Index")
}

pub fn default_cp() -> SeriesRef {
    SeriesRef::px_last("CPDR3ANC Index")
}

pub fn default_rrp() -> SeriesRef {
    SeriesRef::px_last("TOMOTCSO Index")
}

pub fn default_money_lookback_days() -> u32 {
    40
}

pub fn default_sofr_effr_bp() -> f64 {
    5.0
}

pub fn default_cp_basis_bp() -> f64 {
    10.0
}

pub fn default_band_proximity_bp() -> f64 {
    2.0
}

// === Bonds ===

pub fn default_ust_2y() -> SeriesRef {
    SeriesRef::px_last("USGG2YR Index")
}

pub fn default_ust_10y() -> SeriesRef {
    SeriesRef::px_last("USGG10YR Index")
}

pub fn default_ust_3m() -> SeriesRef {
    SeriesRef::px_last("USGG3M Index")
}

pub fn default_ig_oas() -> SeriesRef {
    SeriesRef::px_last("LUACOAS Index")
}

pub fn default_hy_oas() -> SeriesRef {
    SeriesRef::px_last("LF98OAS Index")
}

pub fn default_move() -> SeriesRef {
    SeriesRef::px_last("MOVE Index")
}

pub fn default_ig_etf() -> Option<String> {
    Some("LQD US Equity".to_string())
}

pub fn default_hy_etf() -> Option<String> {
    Some("HYG US Equity".to_string())
}

pub fn default_bonds_lookback_days() -> u32 {
    45
}

pub fn default_curve_inversion_bp() -> f64 {
    -1.0
}

pub fn default_ig_widen_bp() -> f64 {
    10.0
}

pub fn default_hy_widen_bp() -> f64 {
    25.0
}

// === Equities ===

pub fn default_equity_index() -> SeriesRef {
    SeriesRef::px_last("SPX Index")
}

pub fn default_vol_proxy() -> Option<SeriesRef> {
    Some(SeriesRef::px_last("VIX Index"))
}

pub fn default_ten_year() -> Option<SeriesRef> {
    Some(SeriesRef::px_last("USGG10YR Index"))
}

pub fn default_fwd_pe_field() -> String {
    "FWD_PX_TO_EPS".to_string()
}

pub fn default_members_field() -> String {
    "INDX_MEMBERS".to_string()
}

pub fn default_member_suffix() -> String {
    " Equity".to_string()
}

pub fn default_ma200_field() -> String {
    "MOV_AVG_200D".to_string()
}

pub fn default_shares_out_field() -> String {
    "CUR_MKT_CAP_SHARES_OUT".to_string()
}

pub fn default_mkt_cap_field() -> String {
    "CUR_MKT_CAP".to_string()
}

pub fn default_equities_lookback_days() -> u32 {
    45
}

pub fn default_max_members() -> usize {
    1200
}

// === Futures & options ===

pub fn default_underlyings() -> Vec<UnderlyingConfig> {
    vec![
        UnderlyingConfig::new(
            "WTI",
            &["CLX5 Comdty", "CLZ5 Comdty", "CLF6 Comdty"],
            Some("USOILSP Index"),
        ),
        UnderlyingConfig::new(
            "S&P",
            &["ESZ5 Index", "ESH6 Index", "ESM6 Index"],
            Some("SPX Index"),
        ),
        UnderlyingConfig::new(
            "Gold",
            &["GCZ5 Comdty", "GCG6 Comdty", "GCM6 Comdty"],
            Some("XAU Curncy"),
        ),
    ]
}

pub fn default_option_volume_field() -> String {
    "PX_VOLUME".to_string()
}

pub fn default_open_interest_field() -> String {
    "OPEN_INT".to_string()
}

pub fn default_expiry_field() -> String {
    "LAST_TRADEABLE_DT".to_string()
}

pub fn default_option_tenors() -> Vec<String> {
    vec!["1M".to_string(), "3M".to_string()]
}

pub fn default_contango_bp() -> f64 {
    50.0
}

pub fn default_backwardation_bp() -> f64 {
    -50.0
}

pub fn default_wide_spread_bps() -> f64 {
    10.0
}

pub fn default_low_oi_threshold() -> f64 {
    1_000.0
}
