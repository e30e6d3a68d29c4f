//! Configuration types for netpath
//!
//! This module defines all configuration structures used by the engine and
//! the command line tool. Configuration is loaded from JSON files.

use serde::{Deserialize, Serialize};

use crate::diag::Severity;
use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Path engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log.validate()?;
        self.engine.validate()?;
        Ok(())
    }

    /// Create a default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }
}

/// Path engine settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Number of concurrent analysis units.
    ///
    /// With 1, background passes run inline before the foreground pass.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Severity used when path restriction members outside of any loop are
    /// dropped. The restriction is narrowed in either case.
    #[serde(default = "default_misplaced_restriction")]
    pub misplaced_restriction: Severity,

    /// Emit info diagnostics, e.g. about removed redundant restrictions
    #[serde(default)]
    pub show_diag: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            misplaced_restriction: default_misplaced_restriction(),
            show_diag: false,
        }
    }
}

impl EngineConfig {
    /// Validate engine settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "concurrency must be greater than 0".into(),
            ));
        }
        if self.misplaced_restriction == Severity::Info {
            return Err(ConfigError::ValidationError(
                "misplaced_restriction must be 'warning' or 'error'".into(),
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Include timestamps
    #[serde(default = "default_true")]
    pub timestamps: bool,

    /// Include target (module path)
    #[serde(default)]
    pub target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            timestamps: true,
            target: false,
        }
    }
}

impl LogConfig {
    /// Validate logging settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for an unknown format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.format.as_str() {
            "json" | "text" => Ok(()),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown log format '{other}', expected 'json' or 'text'"
            ))),
        }
    }
}

// Default value functions

const fn default_true() -> bool {
    true
}

const fn default_concurrency() -> usize {
    1
}

const fn default_misplaced_restriction() -> Severity {
    Severity::Warning
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "text".into()
}
