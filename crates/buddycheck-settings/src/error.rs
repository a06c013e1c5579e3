//! Error types for the settings crate.

use buddycheck_core::DimensionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or validating a configuration.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file could not be written.
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Config file must be .json or .toml: {0}")]
    UnsupportedFormat(PathBuf),

    /// JSON serialization/deserialization error.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("Invalid TOML config: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Failed to serialize TOML config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The dimension set or options are not buildable.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] DimensionError),

    /// A non-dimensional setting is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// No platform configuration directory could be determined.
    #[error("No configuration directory available on this platform")]
    NoConfigDirectory,
}

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
