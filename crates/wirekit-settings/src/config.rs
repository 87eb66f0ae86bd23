//! Configuration file handling for WireKit
//!
//! Configuration is organized into sections:
//! - Pipeline parameters (scale, smoothing budget, sampling, axes)
//! - Output preferences (stroke colour, number precision, overwrite)
//! - Logging (level and line format)
//!
//! Files are JSON or TOML, chosen by extension. Missing keys fall back to
//! defaults, and every load and save is validated.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use wirekit_centerline::PipelineConfig;

/// Largest number of decimal places written to the SVG
pub const MAX_PRECISION: usize = 10;

/// Config file name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Warn
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// SVG output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// SVG stroke colour, any CSS colour value
    pub stroke_color: String,
    /// Decimal places for emitted coordinates
    pub precision: usize,
    /// Replace an existing output file
    pub overwrite: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            stroke_color: "black".to_string(),
            precision: 4,
            overwrite: true,
        }
    }
}

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn detect(path: &Path) -> SettingsResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                path.display()
            ))),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::detect(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::detect(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Load `path` if given, else the platform config file if it exists,
    /// else defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.pipeline.validate()?;

        let color = self.output.stroke_color.trim();
        if color.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.stroke_color".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.output.precision > MAX_PRECISION {
            return Err(SettingsError::InvalidSetting {
                key: "output.precision".to_string(),
                reason: format!("must be at most {}", MAX_PRECISION),
            });
        }

        Ok(())
    }
}

/// `<config dir>/wirekit/config.toml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("wirekit");
    path.push(CONFIG_FILE_NAME);
    Some(path)
}
