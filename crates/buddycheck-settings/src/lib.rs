//! BuddyCheck Settings Crate
//!
//! Loads, validates and saves the generator configuration.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, CONFIG_FILE_NAME};
pub use error::{Result, SettingsError};
