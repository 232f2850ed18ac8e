//! Configuration for the qcanvas CLI.
//!
//! Supports loading configuration from:
//! 1. A YAML file (`--config PATH`, or `~/.qcanvas/config.yaml` when present)
//! 2. Environment variables (with QCANVAS_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Projection output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Projection cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given: "trace", "debug", "info",
    /// "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "table" or "json"
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Decimal places in table output
    #[serde(default = "default_precision")]
    pub precision: usize,
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Route projections through the per-revision cache
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_precision() -> usize {
    4
}

fn default_true() -> bool {
    true
}

/// Largest accepted table precision; f64 carries about 15 significant digits.
const MAX_PRECISION: usize = 15;

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            precision: default_precision(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Environment variable overrides
    /// 2. The given file, or the default file if it exists
    /// 3. Defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = config_file
            .map(Path::to_path_buf)
            .or_else(|| default_config_path().filter(|p| p.exists()));

        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are explicitly set override the file-loaded (or
    /// default) values.
    fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        // Logging
        if let Some(v) = var("QCANVAS_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("QCANVAS_LOG_FORMAT") {
            self.logging.format = v;
        }

        // Output
        if let Some(v) = var("QCANVAS_OUTPUT_FORMAT") {
            self.output.format = v;
        }
        if let Some(v) = var("QCANVAS_PRECISION") {
            if let Ok(val) = v.parse() {
                self.output.precision = val;
            }
        }

        // Cache
        if let Some(v) = var("QCANVAS_CACHE") {
            if let Ok(val) = v.parse() {
                self.cache.enabled = val;
            }
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        match self.output.format.as_str() {
            "table" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid output format: {other}"
                )));
            }
        }

        if self.output.precision > MAX_PRECISION {
            return Err(ConfigError::ValidationError(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.output.precision
            )));
        }

        Ok(())
    }
}

/// Return the default config file location (~/.qcanvas/config.yaml).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qcanvas").join("config.yaml"))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
