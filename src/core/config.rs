// src/core/config.rs

use crate::core::common::OxiqueryError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Log levels accepted for `log_level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Engine and driver configuration.
///
/// Missing keys in a TOML file fall back to [`Config::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Upper bound on rows a Sort or NestedLoopJoin may buffer. `None` is unbounded.
    pub max_materialized_rows: Option<usize>,
    pub log_level: String,
    /// Dataset the command-line driver loads when none is given.
    pub dataset_path: Option<PathBuf>,
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    max_materialized_rows: Option<usize>,
    log_level: Option<String>,
    dataset_path: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Creates a new ConfigBuilder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the materialization limit for Sort and Join
    #[must_use]
    pub fn max_materialized_rows(mut self, rows: usize) -> Self {
        self.max_materialized_rows = Some(rows);
        self
    }

    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    #[must_use]
    pub fn dataset_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dataset_path = Some(path.into());
        self
    }

    /// Builds the Config instance with validation
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::Configuration` if a value is out of range.
    pub fn build(self) -> Result<Config, OxiqueryError> {
        let defaults = Config::default();
        let config = Config {
            max_materialized_rows: self.max_materialized_rows.or(defaults.max_materialized_rows),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            dataset_path: self.dataset_path.or(defaults.dataset_path),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { max_materialized_rows: None, log_level: "info".to_string(), dataset_path: None }
    }
}

impl Config {
    /// Creates a new ConfigBuilder for fluent configuration
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::Configuration` describing the first invalid value.
    pub fn validate(&self) -> Result<(), OxiqueryError> {
        if self.max_materialized_rows == Some(0) {
            return Err(OxiqueryError::Configuration(
                "max_materialized_rows must be greater than 0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(OxiqueryError::Configuration(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }

        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::Configuration` if parsing or validation fails,
    /// `OxiqueryError::Io` if the file exists but cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, OxiqueryError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    OxiqueryError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                config.validate()?;
                tracing::debug!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(OxiqueryError::Io(e)),
        }
    }

    /// Loads configuration from an optional TOML file path.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load_from_file`].
    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, OxiqueryError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Configuration for tests: small materialization cap, verbose logging.
    ///
    /// # Errors
    ///
    /// Never fails in practice; returns the builder's validation result.
    pub fn for_testing() -> Result<Self, OxiqueryError> {
        Self::builder().max_materialized_rows(1024).log_level("debug").build()
    }
}
