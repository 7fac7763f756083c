//! Cross-market diagnostic meta-dashboard
//!
//! Runs the selected market health checks against a market data snapshot and
//! renders one text or JSON dashboard. The exit code tells a scheduler
//! whether anything needs attention.

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Action, Cli, OutputFormat};
use common::Selection;
use config::{generate_default_config, load_config, save_config, validate_config, HealthConfig, ValidationReport};
use dashboard::{render_json, render_load_failures, render_text, run_dashboard, RunContext};
use health_checks::standard_registry;
use market_data::{DataSource, SnapshotSource};
use observability::init_logging;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

/// Exit code for configuration and setup failures
const SETUP_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(e) = init_logging("mktdash", cli.log_format.into()) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }
    debug!(?cli, "CLI arguments parsed");

    match execute(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(SETUP_FAILURE)
        }
    }
}

fn execute(cli: &Cli) -> Result<u8> {
    match cli.action() {
        Action::InitConfig(path) => {
            info!("Executing 'init-config'");
            init_command(&path)?;
            Ok(0)
        }
        Action::ValidateConfig => {
            info!("Executing 'validate-config'");
            let config = load_or_default(cli.config.as_deref())?;
            let report = validate_config(&config);
            print_validation_report(&report);
            Ok(if report.is_valid() { 0 } else { SETUP_FAILURE })
        }
        Action::Run(selection) => run_command(cli, &selection),
    }
}

fn load_or_default(path: Option<&Path>) -> Result<HealthConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            debug!("No config file given; using built-in defaults");
            Ok(generate_default_config())
        }
    }
}

fn run_command(cli: &Cli, selection: &Selection) -> Result<u8> {
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(snapshot) = &cli.snapshot {
        config.data_source.snapshot = snapshot.clone();
    }

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!(
            "Configuration validation failed with {} error(s)",
            report.errors.len()
        );
    }

    let as_of = cli
        .as_of
        .or(config.as_of)
        .unwrap_or_else(|| Utc::now().date_naive());
    let source = SnapshotSource::from_path(config.data_source.snapshot.clone());
    info!(source = %source.describe(), %as_of, "Market data source ready");

    let registry = standard_registry(&config);
    let ctx = RunContext::new(&source, as_of);
    let run = run_dashboard(&registry, selection, &ctx);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => {
            render_text(&run, cli.quiet_on_success, &mut out).context("Failed to write dashboard")?;
            render_load_failures(&run, &mut std::io::stderr().lock())
                .context("Failed to write load failures")?;
        }
        OutputFormat::Json => {
            let json = render_json(&run).context("Failed to serialize dashboard")?;
            writeln!(out, "{}", json).context("Failed to write dashboard")?;
        }
    }
    out.flush().context("Failed to flush stdout")?;

    let status = run.exit_status();
    info!(?status, code = status.code(), "Dashboard complete");
    Ok(status.code())
}

fn print_validation_report(report: &ValidationReport) {
    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        return;
    }

    println!("[ok] Configuration is valid!");
}

fn init_command(output_path: &Path) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point data_source.snapshot at a market data snapshot");
    println!("  2. Adjust tickers, windows and flag thresholds per market");
    println!("  3. Run 'mktdash --validate-config --config {:?}' to check it", output_path);
    println!("  4. Run 'mktdash --all --config {:?}' to build the dashboard", output_path);

    Ok(())
}
