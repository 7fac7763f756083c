use crate::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{section}: {field} must not be empty")]
    EmptyList { section: String, field: String },

    #[error("{section}: ticker for {field} must not be empty")]
    EmptyTicker { section: String, field: String },

    #[error("{section}: {message}")]
    InvalidWindow { section: String, message: String },

    #[error("{section}: duplicate entry '{value}' in {field}")]
    Duplicate {
        section: String,
        field: String,
        value: String,
    },

    #[error("futures_options: underlying '{name}' has no contracts")]
    NoContracts { name: String },

    #[error("futures_options: template {field} = '{template}' has no {{tenor}} placeholder")]
    InvalidTemplate { field: String, template: String },

    #[error("{field} must be a finite number")]
    InvalidThreshold { field: String },

    #[error("Environment variable placeholder in '{field}' was not resolved: {value}")]
    UnresolvedEnvVar { field: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &HealthConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_data_source(config, &mut report);

    if config.fx.enabled {
        validate_fx(&config.fx, &mut report);
    }
    if config.money.enabled {
        validate_money(&config.money, &mut report);
    }
    if config.bonds.enabled {
        validate_bonds(&config.bonds, &mut report);
    }
    if config.equities.enabled {
        validate_equities(&config.equities, &mut report);
    }
    if config.futures_options.enabled {
        validate_futures_options(&config.futures_options, &mut report);
    }

    let enabled = [
        config.fx.enabled,
        config.money.enabled,
        config.bonds.enabled,
        config.equities.enabled,
        config.futures_options.enabled,
    ];
    if !enabled.iter().any(|e| *e) {
        report.add_warning("markets", "All markets are disabled; --all will run nothing");
    }

    report
}

fn validate_data_source(config: &HealthConfig, report: &mut ValidationReport) {
    let snapshot = config.data_source.snapshot.to_string_lossy();
    if has_unresolved_env_vars(&snapshot) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: "data_source.snapshot".to_string(),
            value: snapshot.to_string(),
        });
    } else if !config.data_source.snapshot.exists() {
        report.add_warning(
            "data_source.snapshot",
            &format!("Snapshot file {} does not exist yet", snapshot),
        );
    }

    if config.as_of.is_none() {
        report.add_default("as_of", "today (UTC)");
    }
}

fn validate_fx(fx: &FxConfig, report: &mut ValidationReport) {
    check_non_empty_list("fx", "pairs", &fx.pairs, report);
    check_non_empty_list("fx", "vol_tenors", &fx.vol_tenors, report);
    check_unique("fx", "pairs", &fx.pairs, report);

    for pair in &fx.pairs {
        if pair.len() != 6 {
            report.add_warning(
                "fx.pairs",
                &format!("'{}' is not a six-letter currency pair", pair),
            );
        }
    }

    if fx.realized_tenors.is_empty() {
        report.add_warning("fx.realized_tenors", "No realized vol tenors; realized vol lines are omitted");
    }
}

fn validate_money(money: &MoneyConfig, report: &mut ValidationReport) {
    for (field, series) in [
        ("effr", &money.effr),
        ("band_upper", &money.band_upper),
        ("band_lower", &money.band_lower),
        ("sofr", &money.sofr),
        ("cp", &money.cp),
        ("rrp", &money.rrp),
    ] {
        check_series("money", field, series, report);
    }

    check_window("money", money.lookback_days, money.obs_days, report);

    match (&money.credit_3m, &money.ois_3m) {
        (Some(_), None) | (None, Some(_)) => report.add_warning(
            "money.credit_3m",
            "credit_3m and ois_3m must both be set for the 3M credit vs OIS spread",
        ),
        _ => {}
    }

    let t = &money.thresholds;
    check_threshold("money.thresholds.sofr_effr_bp", t.sofr_effr_bp, report);
    check_threshold("money.thresholds.cp_effr_bp", t.cp_effr_bp, report);
    check_threshold("money.thresholds.cp_sofr_bp", t.cp_sofr_bp, report);
    check_threshold("money.thresholds.band_proximity_bp", t.band_proximity_bp, report);
}

fn validate_bonds(bonds: &BondsConfig, report: &mut ValidationReport) {
    for (field, series) in [
        ("ust_2y", &bonds.ust_2y),
        ("ust_10y", &bonds.ust_10y),
        ("ust_3m", &bonds.ust_3m),
        ("ig_oas", &bonds.ig_oas),
        ("hy_oas", &bonds.hy_oas),
        ("move_index", &bonds.move_index),
    ] {
        check_series("bonds", field, series, report);
    }

    check_window("bonds", bonds.lookback_days, bonds.obs_days, report);

    let t = &bonds.thresholds;
    check_threshold("bonds.thresholds.curve_inversion_bp", t.curve_inversion_bp, report);
    check_threshold("bonds.thresholds.ig_widen_bp", t.ig_widen_bp, report);
    check_threshold("bonds.thresholds.hy_widen_bp", t.hy_widen_bp, report);
}

fn validate_equities(eq: &EquitiesConfig, report: &mut ValidationReport) {
    check_series("equities", "index", &eq.index, report);
    check_window("equities", eq.lookback_days, eq.rv_obs_days + 1, report);

    if eq.members_field.trim().is_empty() {
        report.add_error(ValidationError::EmptyList {
            section: "equities".to_string(),
            field: "members_field".to_string(),
        });
    }
    if eq.max_members == 0 {
        report.add_error(ValidationError::InvalidWindow {
            section: "equities".to_string(),
            message: "max_members must be a positive integer".to_string(),
        });
    }
    if eq.ten_year.is_none() {
        report.add_warning("equities.ten_year", "No 10Y yield configured; ERP is not computed");
    }
}

fn validate_futures_options(fo: &FuturesOptionsConfig, report: &mut ValidationReport) {
    if fo.underlyings.is_empty() {
        report.add_error(ValidationError::EmptyList {
            section: "futures_options".to_string(),
            field: "underlyings".to_string(),
        });
    }

    let names: Vec<String> = fo.underlyings.iter().map(|u| u.name.clone()).collect();
    check_unique("futures_options", "underlyings", &names, report);

    for u in &fo.underlyings {
        if u.contracts.is_empty() {
            report.add_error(ValidationError::NoContracts { name: u.name.clone() });
        } else if u.contracts.len() < 2 {
            report.add_warning(
                &format!("futures_options.underlyings.{}", u.name),
                "Fewer than two contracts; roll and slope are not computed",
            );
        }
    }

    for (field, template) in [
        ("atm_template", &fo.atm_template),
        ("rr25_template", &fo.rr25_template),
        ("bf25_template", &fo.bf25_template),
    ] {
        if let Some(template) = template {
            if !template.contains("{tenor}") {
                report.add_error(ValidationError::InvalidTemplate {
                    field: field.to_string(),
                    template: template.clone(),
                });
            }
        }
    }
    if fo.has_option_templates() && fo.option_tenors.is_empty() {
        check_non_empty_list("futures_options", "option_tenors", &fo.option_tenors, report);
    }

    let t = &fo.thresholds;
    check_threshold("futures_options.thresholds.contango_bp", t.contango_bp, report);
    check_threshold("futures_options.thresholds.backwardation_bp", t.backwardation_bp, report);
    check_threshold("futures_options.thresholds.wide_spread_bps", t.wide_spread_bps, report);
    check_threshold("futures_options.thresholds.low_open_interest", t.low_open_interest, report);
    if t.backwardation_bp >= t.contango_bp {
        report.add_warning(
            "futures_options.thresholds",
            "backwardation_bp is not below contango_bp; a curve may be flagged both ways",
        );
    }
}

fn check_series(section: &str, field: &str, series: &SeriesRef, report: &mut ValidationReport) {
    if series.ticker.trim().is_empty() {
        report.add_error(ValidationError::EmptyTicker {
            section: section.to_string(),
            field: field.to_string(),
        });
    }
}

fn check_non_empty_list(section: &str, field: &str, values: &[String], report: &mut ValidationReport) {
    if values.is_empty() {
        report.add_error(ValidationError::EmptyList {
            section: section.to_string(),
            field: field.to_string(),
        });
    }
}

fn check_unique(section: &str, field: &str, values: &[String], report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for v in values {
        if !seen.insert(v.as_str()) {
            report.add_error(ValidationError::Duplicate {
                section: section.to_string(),
                field: field.to_string(),
                value: v.clone(),
            });
        }
    }
}

/// `obs` observations must fit in `lookback_days` calendar days
fn check_window(section: &str, lookback_days: u32, obs: usize, report: &mut ValidationReport) {
    if lookback_days == 0 {
        report.add_error(ValidationError::InvalidWindow {
            section: section.to_string(),
            message: "lookback_days must be a positive integer".to_string(),
        });
        return;
    }
    if obs < 2 {
        report.add_error(ValidationError::InvalidWindow {
            section: section.to_string(),
            message: format!("observation window of {} is too short for a deviation", obs),
        });
    } else if obs > lookback_days as usize {
        report.add_error(ValidationError::InvalidWindow {
            section: section.to_string(),
            message: format!(
                "{} observations cannot fit in a {}-day lookback",
                obs, lookback_days
            ),
        });
    }
}

fn check_threshold(field: &str, value: f64, report: &mut ValidationReport) {
    if !value.is_finite() {
        report.add_error(ValidationError::InvalidThreshold {
            field: field.to_string(),
        });
    }
}
