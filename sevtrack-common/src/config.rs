//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument / environment variable (carried in [`ConfigOverrides`])
//! 2. TOML config file
//! 3. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://sevtrack.db?mode=rwc";
pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_SINGLE_SCRIPT: &str = "./single_bug_model.py";
pub const DEFAULT_BATCH_SCRIPT: &str = "./multiple_bug_model.py";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub classifier: ClassifierToml,
}

/// `[classifier]` table of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierToml {
    pub interpreter: Option<String>,
    pub single_script: Option<PathBuf>,
    pub batch_script: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub database_url: Option<String>,
    pub interpreter: Option<String>,
    pub single_script: Option<PathBuf>,
    pub batch_script: Option<PathBuf>,
    pub classifier_timeout_secs: Option<u64>,
}

/// External classifier invocation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Program used to run the scripts (e.g. `python3`)
    pub interpreter: String,
    /// Script invoked as `<interpreter> <script> <title> <description>`
    pub single_script: PathBuf,
    /// Script invoked as `<interpreter> <script> <json pairs>`
    pub batch_script: PathBuf,
    /// `None` waits for the process indefinitely
    pub timeout: Option<Duration>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_level: String,
    pub classifier: ClassifierConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::resolve(ConfigOverrides::default(), TomlConfig::default())
    }
}

impl ServiceConfig {
    /// Merge overrides, TOML values and compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Self {
        let classifier = ClassifierConfig {
            interpreter: overrides
                .interpreter
                .or(toml.classifier.interpreter)
                .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string()),
            single_script: overrides
                .single_script
                .or(toml.classifier.single_script)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SINGLE_SCRIPT)),
            batch_script: overrides
                .batch_script
                .or(toml.classifier.batch_script)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BATCH_SCRIPT)),
            timeout: overrides
                .classifier_timeout_secs
                .or(toml.classifier.timeout_secs)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        Self {
            host: overrides
                .host
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            database_url: overrides
                .database_url
                .or(toml.database_url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            log_level: toml
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            classifier,
        }
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    let config = toml::from_str(&content)?;
    debug!("Parsed config file {}", path.display());
    Ok(config)
}

/// Platform config file location: `<config_dir>/sevtrack/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sevtrack").join("config.toml"))
}

/// Locate and load the TOML layer
///
/// An explicitly requested file must exist and parse. The platform default
/// file is optional; when absent, an empty config is returned.
pub fn load_config_layer(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        info!("Loading config file {}", path.display());
        return load_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading config file {}", path.display());
            load_toml_config(&path)
        }
        _ => {
            debug!("No config file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}
