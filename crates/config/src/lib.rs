use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level dashboard configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    #[serde(default)]
    pub data_source: DataSourceConfig,
    /// Date the lookback windows end on; today (UTC) when unset
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub fx: FxConfig,
    #[serde(default)]
    pub money: MoneyConfig,
    #[serde(default)]
    pub bonds: BondsConfig,
    #[serde(default)]
    pub equities: EquitiesConfig,
    #[serde(default)]
    pub futures_options: FuturesOptionsConfig,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            data_source: DataSourceConfig::default(),
            as_of: None,
            fx: FxConfig::default(),
            money: MoneyConfig::default(),
            bonds: BondsConfig::default(),
            equities: EquitiesConfig::default(),
            futures_options: FuturesOptionsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataSourceConfig {
    /// Snapshot file; relative paths resolve against the config file's directory
    #[serde(default = "default_snapshot_path")]
    pub snapshot: PathBuf,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot_path(),
        }
    }
}

/// A security and the field read from it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeriesRef {
    pub ticker: String,
    #[serde(default = "default_px_field")]
    pub field: String,
}

impl SeriesRef {
    pub fn new(ticker: &str, field: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            field: field.to_string(),
        }
    }

    pub fn px_last(ticker: &str) -> Self {
        Self::new(ticker, "PX_LAST")
    }
}

// ============================================================================
// FX
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FxConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Six-letter pairs, e.g. EURUSD
    #[serde(default = "default_fx_pairs")]
    pub pairs: Vec<String>,
    /// Tenors for ATM vol, 25-delta risk reversal and butterfly
    #[serde(default = "default_fx_vol_tenors")]
    pub vol_tenors: Vec<String>,
    /// Tenors for realized vol tickers
    #[serde(default = "default_fx_realized_tenors")]
    pub realized_tenors: Vec<String>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            pairs: default_fx_pairs(),
            vol_tenors: default_fx_vol_tenors(),
            realized_tenors: default_fx_realized_tenors(),
        }
    }
}

// ============================================================================
// Money markets
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoneyConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Effective fed funds
    #[serde(default = "default_effr")]
    pub effr: SeriesRef,
    /// FOMC target band upper bound
    #[serde(default = "default_band_upper")]
    pub band_upper: SeriesRef,
    /// FOMC target band lower bound
    #[serde(default = "default_band_lower")]
    pub band_lower: SeriesRef,
    #[serde(default = "default_sofr")]
    pub sofr: SeriesRef,
    /// 30D AA non-financial commercial paper
    #[serde(default = "default_cp")]
    pub cp: SeriesRef,
    /// ON RRP award rate
    #[serde(default = "default_rrp")]
    pub rrp: SeriesRef,
    /// Optional OIS points
    #[serde(default)]
    pub ois: Vec<OisPoint>,
    #[serde(default = "default_px_field")]
    pub ois_field: String,
    /// Optional 3M credit benchmark, compared against `ois_3m`
    #[serde(default)]
    pub credit_3m: Option<String>,
    #[serde(default)]
    pub ois_3m: Option<String>,
    #[serde(default = "default_px_field")]
    pub credit_ois_field: String,
    #[serde(default = "default_money_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_obs_days")]
    pub obs_days: usize,
    #[serde(default)]
    pub thresholds: MoneyThresholds,
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            effr: default_effr(),
            band_upper: default_band_upper(),
            band_lower: default_band_lower(),
            sofr: default_sofr(),
            cp: default_cp(),
            rrp: default_rrp(),
            ois: Vec::new(),
            ois_field: default_px_field(),
            credit_3m: None,
            ois_3m: None,
            credit_ois_field: default_px_field(),
            lookback_days: default_money_lookback_days(),
            obs_days: default_obs_days(),
            thresholds: MoneyThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OisPoint {
    pub tenor: String,
    pub ticker: String,
}

/// Flag thresholds, all in basis points
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoneyThresholds {
    #[serde(default = "default_sofr_effr_bp")]
    pub sofr_effr_bp: f64,
    #[serde(default = "default_cp_basis_bp")]
    pub cp_effr_bp: f64,
    #[serde(default = "default_cp_basis_bp")]
    pub cp_sofr_bp: f64,
    /// EFFR closer than this to either band bound is flagged
    #[serde(default = "default_band_proximity_bp")]
    pub band_proximity_bp: f64,
}

impl Default for MoneyThresholds {
    fn default() -> Self {
        Self {
            sofr_effr_bp: default_sofr_effr_bp(),
            cp_effr_bp: default_cp_basis_bp(),
            cp_sofr_bp: default_cp_basis_bp(),
            band_proximity_bp: default_band_proximity_bp(),
        }
    }
}

// ============================================================================
// Bonds
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BondsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Treasury yields, quoted in percent
    #[serde(default = "default_ust_2y")]
    pub ust_2y: SeriesRef,
    #[serde(default = "default_ust_10y")]
    pub ust_10y: SeriesRef,
    #[serde(default = "default_ust_3m")]
    pub ust_3m: SeriesRef,
    /// Credit OAS, quoted in bp
    #[serde(default = "default_ig_oas")]
    pub ig_oas: SeriesRef,
    #[serde(default = "default_hy_oas")]
    pub hy_oas: SeriesRef,
    #[serde(default = "default_move")]
    pub move_index: SeriesRef,
    /// ETF liquidity proxies; skipped when unset
    #[serde(default = "default_ig_etf")]
    pub ig_etf: Option<String>,
    #[serde(default = "default_hy_etf")]
    pub hy_etf: Option<String>,
    #[serde(default)]
    pub etf_fields: QuoteFields,
    #[serde(default = "default_bonds_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_obs_days")]
    pub obs_days: usize,
    #[serde(default)]
    pub thresholds: BondThresholds,
}

impl Default for BondsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ust_2y: default_ust_2y(),
            ust_10y: default_ust_10y(),
            ust_3m: default_ust_3m(),
            ig_oas: default_ig_oas(),
            hy_oas: default_hy_oas(),
            move_index: default_move(),
            ig_etf: default_ig_etf(),
            hy_etf: default_hy_etf(),
            etf_fields: QuoteFields::default(),
            lookback_days: default_bonds_lookback_days(),
            obs_days: default_obs_days(),
            thresholds: BondThresholds::default(),
        }
    }
}

/// Field names for a quoted instrument
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteFields {
    #[serde(default = "default_bid_field")]
    pub bid: String,
    #[serde(default = "default_ask_field")]
    pub ask: String,
    #[serde(default = "default_px_field")]
    pub last: String,
    #[serde(default = "default_volume_field")]
    pub volume: String,
}

impl Default for QuoteFields {
    fn default() -> Self {
        Self {
            bid: default_bid_field(),
            ask: default_ask_field(),
            last: default_px_field(),
            volume: default_volume_field(),
        }
    }
}

impl QuoteFields {
    pub fn all(&self) -> [&str; 4] {
        [&self.bid, &self.ask, &self.last, &self.volume]
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BondThresholds {
    /// 2s10s slope below this (bp) is flagged as inverted
    #[serde(default = "default_curve_inversion_bp")]
    pub curve_inversion_bp: f64,
    #[serde(default = "default_ig_widen_bp")]
    pub ig_widen_bp: f64,
    #[serde(default = "default_hy_widen_bp")]
    pub hy_widen_bp: f64,
}

impl Default for BondThresholds {
    fn default() -> Self {
        Self {
            curve_inversion_bp: default_curve_inversion_bp(),
            ig_widen_bp: default_ig_widen_bp(),
            hy_widen_bp: default_hy_widen_bp(),
        }
    }
}

// ============================================================================
// Equities
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EquitiesConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_equity_index")]
    pub index: SeriesRef,
    #[serde(default = "default_fwd_pe_field")]
    pub index_fwd_pe_field: String,
    /// Implied-vol proxy; skipped when unset
    #[serde(default = "default_vol_proxy")]
    pub vol_proxy: Option<SeriesRef>,
    /// 10Y yield (percent) for the equity risk premium; skipped when unset
    #[serde(default = "default_ten_year")]
    pub ten_year: Option<SeriesRef>,
    /// Bulk field listing index members
    #[serde(default = "default_members_field")]
    pub members_field: String,
    /// Appended to each member identifier to form its security
    #[serde(default = "default_member_suffix")]
    pub member_suffix: String,
    #[serde(default)]
    pub member_fields: MemberFields,
    #[serde(default = "default_equities_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_obs_days")]
    pub rv_obs_days: usize,
    #[serde(default = "default_max_members")]
    pub max_members: usize,
}

impl Default for EquitiesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            index: default_equity_index(),
            index_fwd_pe_field: default_fwd_pe_field(),
            vol_proxy: default_vol_proxy(),
            ten_year: default_ten_year(),
            members_field: default_members_field(),
            member_suffix: default_member_suffix(),
            member_fields: MemberFields::default(),
            lookback_days: default_equities_lookback_days(),
            rv_obs_days: default_obs_days(),
            max_members: default_max_members(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemberFields {
    #[serde(default = "default_px_field")]
    pub px: String,
    #[serde(default = "default_ma200_field")]
    pub ma200: String,
    #[serde(default = "default_bid_field")]
    pub bid: String,
    #[serde(default = "default_ask_field")]
    pub ask: String,
    #[serde(default = "default_volume_field")]
    pub volume: String,
    #[serde(default = "default_shares_out_field")]
    pub shares_out: String,
    #[serde(default = "default_mkt_cap_field")]
    pub mkt_cap: String,
    #[serde(default = "default_fwd_pe_field")]
    pub fwd_pe: String,
}

impl Default for MemberFields {
    fn default() -> Self {
        Self {
            px: default_px_field(),
            ma200: default_ma200_field(),
            bid: default_bid_field(),
            ask: default_ask_field(),
            volume: default_volume_field(),
            shares_out: default_shares_out_field(),
            mkt_cap: default_mkt_cap_field(),
            fwd_pe: default_fwd_pe_field(),
        }
    }
}

impl MemberFields {
    pub fn all(&self) -> [&str; 8] {
        [
            &self.px,
            &self.ma200,
            &self.bid,
            &self.ask,
            &self.volume,
            &self.shares_out,
            &self.mkt_cap,
            &self.fwd_pe,
        ]
    }
}

// ============================================================================
// Futures & options
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesOptionsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Underlyings in report order
    #[serde(default = "default_underlyings")]
    pub underlyings: Vec<UnderlyingConfig>,
    #[serde(default)]
    pub contract_fields: ContractFields,
    #[serde(default = "default_px_field")]
    pub spot_field: String,
    #[serde(default = "default_option_tenors")]
    pub option_tenors: Vec<String>,
    /// Field templates with a `{tenor}` placeholder, e.g. `{tenor}_ATM_IMP_VOL`
    #[serde(default)]
    pub atm_template: Option<String>,
    #[serde(default)]
    pub rr25_template: Option<String>,
    #[serde(default)]
    pub bf25_template: Option<String>,
    #[serde(default = "default_option_volume_field")]
    pub option_volume_field: String,
    #[serde(default)]
    pub thresholds: FuturesThresholds,
}

impl Default for FuturesOptionsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            underlyings: default_underlyings(),
            contract_fields: ContractFields::default(),
            spot_field: default_px_field(),
            option_tenors: default_option_tenors(),
            atm_template: None,
            rr25_template: None,
            bf25_template: None,
            option_volume_field: default_option_volume_field(),
            thresholds: FuturesThresholds::default(),
        }
    }
}

impl FuturesOptionsConfig {
    /// True when any option field template is configured
    pub fn has_option_templates(&self) -> bool {
        self.atm_template.is_some() || self.rr25_template.is_some() || self.bf25_template.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UnderlyingConfig {
    pub name: String,
    /// Futures contracts, front first
    pub contracts: Vec<String>,
    #[serde(default)]
    pub spot: Option<String>,
    /// Security carrying option surface fields; the front contract when unset
    #[serde(default)]
    pub surface_ticker: Option<String>,
    /// Option securities for the put/call ratio
    #[serde(default)]
    pub calls: Vec<String>,
    #[serde(default)]
    pub puts: Vec<String>,
}

impl UnderlyingConfig {
    pub fn new(name: &str, contracts: &[&str], spot: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            contracts: contracts.iter().map(|c| c.to_string()).collect(),
            spot: spot.map(str::to_string),
            surface_ticker: None,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractFields {
    #[serde(default = "default_px_field")]
    pub last: String,
    #[serde(default = "default_bid_field")]
    pub bid: String,
    #[serde(default = "default_ask_field")]
    pub ask: String,
    #[serde(default = "default_option_volume_field")]
    pub volume: String,
    #[serde(default = "default_open_interest_field")]
    pub open_interest: String,
    #[serde(default = "default_expiry_field")]
    pub expiry: String,
}

impl Default for ContractFields {
    fn default() -> Self {
        Self {
            last: default_px_field(),
            bid: default_bid_field(),
            ask: default_ask_field(),
            volume: default_option_volume_field(),
            open_interest: default_open_interest_field(),
            expiry: default_expiry_field(),
        }
    }
}

impl ContractFields {
    pub fn all(&self) -> [&str; 6] {
        [
            &self.last,
            &self.bid,
            &self.ask,
            &self.volume,
            &self.open_interest,
            &self.expiry,
        ]
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesThresholds {
    /// Front-to-next slope above this (bp of front) is flagged as contango
    #[serde(default = "default_contango_bp")]
    pub contango_bp: f64,
    /// Front-to-next slope below this (bp of front) is flagged as backwardation
    #[serde(default = "default_backwardation_bp")]
    pub backwardation_bp: f64,
    /// Contract spreads wider than this (bp of mid) are flagged
    #[serde(default = "default_wide_spread_bps")]
    pub wide_spread_bps: f64,
    #[serde(default = "default_low_oi_threshold")]
    pub low_open_interest: f64,
}

impl Default for FuturesThresholds {
    fn default() -> Self {
        Self {
            contango_bp: default_contango_bp(),
            backwardation_bp: default_backwardation_bp(),
            wide_spread_bps: default_wide_spread_bps(),
            low_open_interest: default_low_oi_threshold(),
        }
    }
}
