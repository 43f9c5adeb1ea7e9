use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::DEFAULT_CONSTRUCTOR;
use crate::error::{IncrementalError, Result};

/// Name of the per-project configuration file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "incremental.toml";

/// Represents the complete configuration for incremental.
///
/// Controls the shape of the generated version file and the calendar used by
/// `--create` and `--rc`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,
}

fn default_file_name() -> String {
    "_version.py".to_string()
}

fn default_constructor() -> String {
    DEFAULT_CONSTRUCTOR.to_string()
}

fn default_import_line() -> String {
    format!("from incremental import {}", DEFAULT_CONSTRUCTOR)
}

fn default_invocation() -> String {
    "incremental-update".to_string()
}

/// Configuration for the generated version file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArtifactConfig {
    /// File name inside the package root.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Constructor name used in the canonical version text.
    #[serde(default = "default_constructor")]
    pub constructor: String,

    /// Line that brings the constructor into scope.
    #[serde(default = "default_import_line")]
    pub import_line: String,

    /// Command shown in the header as the way to regenerate the file.
    #[serde(default = "default_invocation")]
    pub invocation: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig {
            file_name: default_file_name(),
            constructor: default_constructor(),
            import_line: default_import_line(),
            invocation: default_invocation(),
        }
    }
}

fn default_epoch_year() -> i32 {
    2000
}

/// Configuration for calendar versioning.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CalendarConfig {
    /// Subtracted from the current year to get the major number.
    #[serde(default = "default_epoch_year")]
    pub epoch_year: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            epoch_year: default_epoch_year(),
        }
    }
}

impl Config {
    fn validate(self) -> Result<Self> {
        if self.artifact.file_name.is_empty()
            || self.artifact.file_name.contains('/')
            || self.artifact.file_name.contains('\\')
        {
            return Err(IncrementalError::config(format!(
                "artifact.file_name must be a plain file name, got '{}'",
                self.artifact.file_name
            )));
        }
        if self.artifact.constructor.is_empty() {
            return Err(IncrementalError::config(
                "artifact.constructor must not be empty",
            ));
        }
        Ok(self)
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text).map_err(|e| IncrementalError::config(e.to_string()))?;
    config.validate()
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `incremental.toml` in current directory
/// 3. `.incremental.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new(PROJECT_CONFIG_FILE).exists() {
        read_config_file(Path::new(PROJECT_CONFIG_FILE))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".incremental.toml");
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

fn read_config_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "reading configuration");
    fs::read_to_string(path)
        .map_err(|e| IncrementalError::config(format!("{}: {}", path.display(), e)))
}
