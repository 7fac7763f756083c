use clap::{ArgGroup, Parser, ValueEnum};
use common::{MarketId, Selection};
use observability::LogFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mktdash")]
#[command(about = "Cross-market diagnostic meta-dashboard for market health checks")]
#[command(version)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["all", "markets", "validate_config", "init_config"])
))]
pub struct Cli {
    /// Run every registered market in registry order
    #[arg(long)]
    pub all: bool,

    /// Run the given markets in the given order
    #[arg(long, value_enum, num_args = 1.., value_name = "MARKET")]
    pub markets: Vec<MarketArg>,

    /// Validate the configuration and exit
    #[arg(long)]
    pub validate_config: bool,

    /// Write the default configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub init_config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Omit the report body of markets with no flags and no error (text mode)
    #[arg(long)]
    pub quiet_on_success: bool,

    /// Path to the configuration file; built-in defaults when absent
    #[arg(short, long, env = "MKTDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Market snapshot file, overriding the configured data source
    #[arg(long, env = "MKTDASH_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// End date of the lookback windows (YYYY-MM-DD); default is config or today (UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub as_of: Option<chrono::NaiveDate>,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, env = "MKTDASH_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormatArg,
}

/// What the invocation was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run(Selection),
    ValidateConfig,
    InitConfig(PathBuf),
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn action(&self) -> Action {
        if let Some(path) = &self.init_config {
            Action::InitConfig(path.clone())
        } else if self.validate_config {
            Action::ValidateConfig
        } else if self.all {
            Action::Run(Selection::All)
        } else {
            Action::Run(Selection::Markets(
                self.markets.iter().map(|m| MarketId::from(*m)).collect(),
            ))
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketArg {
    /// Foreign exchange
    #[value(name = "FX")]
    Fx,
    /// Money markets
    #[value(name = "Money")]
    Money,
    /// Bond markets
    #[value(name = "Bonds")]
    Bonds,
    /// Equity markets
    #[value(name = "Equities")]
    Equities,
    /// Futures & options
    #[value(name = "FuturesOptions")]
    FuturesOptions,
}

impl From<MarketArg> for MarketId {
    fn from(arg: MarketArg) -> Self {
        match arg {
            MarketArg::Fx => MarketId::Fx,
            MarketArg::Money => MarketId::Money,
            MarketArg::Bonds => MarketId::Bonds,
            MarketArg::Equities => MarketId::Equities,
            MarketArg::FuturesOptions => MarketId::FuturesOptions,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable dashboard
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    #[default]
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mktdash").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_markets_in_given_order() {
        let cli = parse(&["--markets", "Bonds", "FX"]).unwrap();
        assert_eq!(
            cli.action(),
            Action::Run(Selection::Markets(vec![MarketId::Bonds, MarketId::Fx]))
        );
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_market_names_are_case_sensitive() {
        assert!(parse(&["--markets", "fx"]).is_err());
        assert!(parse(&["--markets", "Crypto"]).is_err());
    }

    #[test]
    fn test_action_is_required_and_exclusive() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--all", "--markets", "FX"]).is_err());
        assert!(parse(&["--all", "--validate-config"]).is_err());
    }

    #[test]
    fn test_json_and_options() {
        let cli = parse(&[
            "--all",
            "--format",
            "json",
            "--quiet-on-success",
            "--as-of",
            "2025-10-31",
            "--snapshot",
            "snap.yaml",
        ])
        .unwrap();
        assert_eq!(cli.action(), Action::Run(Selection::All));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet_on_success);
        assert_eq!(cli.as_of, chrono::NaiveDate::from_ymd_opt(2025, 10, 31));
        assert_eq!(cli.snapshot, Some(PathBuf::from("snap.yaml")));
    }

    #[test]
    fn test_invalid_as_of_rejected() {
        assert!(parse(&["--all", "--as-of", "31/10/2025"]).is_err());
    }

    #[test]
    fn test_init_config_action() {
        let cli = parse(&["--init-config", "out.yaml"]).unwrap();
        assert_eq!(cli.action(), Action::InitConfig(PathBuf::from("out.yaml")));
    }
}
