//! Configuration loading and management
//!
//! This module handles loading configuration and topology descriptions from
//! files and environment variables.

use std::path::Path;

use tracing::{debug, info};

use super::topology::TopologyConfig;
use super::types::Config;
use crate::error::ConfigError;
use crate::topology::Topology;

/// Load configuration from a JSON file
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    debug!("Loading configuration from {:?}", path);

    let contents = read_file(path)?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::ParseError(format!("Failed to parse JSON: {e} at {path:?}"))
    })?;

    config.validate()?;

    info!(
        "Configuration loaded: concurrency={}, misplaced_restriction={}",
        config.engine.concurrency, config.engine.misplaced_restriction
    );

    Ok(config)
}

/// Load configuration from a JSON string
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn load_config_str(json: &str) -> Result<Config, ConfigError> {
    let config: Config =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration with environment variable overrides
///
/// Environment variables:
/// - `NETPATH_LOG_LEVEL`: Override log level
/// - `NETPATH_CONCURRENCY`: Override number of concurrent analysis units
///
/// # Errors
///
/// Returns `ConfigError` if loading or parsing fails.
pub fn load_config_with_env(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let mut config = load_config(path)?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    if let Ok(level) = std::env::var("NETPATH_LOG_LEVEL") {
        config.log.level = level;
        debug!("Log level overridden to {}", config.log.level);
    }

    if let Ok(value) = std::env::var("NETPATH_CONCURRENCY") {
        config.engine.concurrency = value.parse().map_err(|_| ConfigError::EnvError {
            name: "NETPATH_CONCURRENCY".into(),
            reason: format!("Invalid number: {value}"),
        })?;
        debug!("Concurrency overridden to {}", config.engine.concurrency);
    }

    // Re-validate after overrides
    config.validate()
}

/// Create a default configuration file at the given path
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be written.
pub fn create_default_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let config = Config::default_config();
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {e}")))?;

    std::fs::write(path, json)?;
    Ok(())
}

/// Load a topology description and build the graph
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed or built.
pub fn load_topology(path: impl AsRef<Path>) -> Result<Topology, ConfigError> {
    let path = path.as_ref();

    debug!("Loading topology from {:?}", path);

    let contents = read_file(path)?;
    let description: TopologyConfig = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::ParseError(format!("Failed to parse JSON: {e} at {path:?}"))
    })?;
    let topology = description.build()?;

    info!(
        "Topology loaded: {} zones, {} routers, {} interfaces",
        topology.zone_count(),
        topology.router_count(),
        topology.interface_count()
    );

    Ok(topology)
}

/// Build a topology from a JSON string
///
/// # Errors
///
/// Returns `ConfigError` if parsing or building fails.
pub fn load_topology_str(json: &str) -> Result<Topology, ConfigError> {
    let description: TopologyConfig =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    description.build()
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}
