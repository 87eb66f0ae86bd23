//! WireKit Settings Crate
//!
//! Handles the application configuration file: pipeline parameters, output
//! preferences and logging, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, Config, LogFormat, LogLevel, LoggingSettings, OutputSettings,
    MAX_PRECISION,
};
pub use error::{SettingsError, SettingsResult};
