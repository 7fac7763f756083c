use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Load a configuration file, substituting environment variables first
///
/// A relative `data_source.snapshot` is resolved against the directory
/// holding the config file.
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<HealthConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let mut config = parse_config(&content)?;

    if let Some(dir) = path.parent() {
        resolve_snapshot_path(&mut config, dir);
    }

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Parse configuration text after environment substitution
pub fn parse_config(content: &str) -> Result<HealthConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    serde_yaml::from_str(&substituted).with_context(|| "Failed to parse YAML configuration")
}

/// Make a relative snapshot path relative to `base_dir` instead of the working directory
pub fn resolve_snapshot_path(config: &mut HealthConfig, base_dir: &Path) {
    let snapshot = &config.data_source.snapshot;
    if snapshot.is_relative() && !base_dir.as_os_str().is_empty() {
        let resolved = base_dir.join(snapshot);
        debug!(from = ?snapshot, to = ?resolved, "Resolved relative snapshot path");
        config.data_source.snapshot = resolved;
    }
}

#[instrument]
pub fn generate_default_config() -> HealthConfig {
    HealthConfig::default()
}

#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &HealthConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}
