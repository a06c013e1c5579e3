//! Generator configuration
//!
//! The whole dimension set, the checklist labels, lettering and tessellation
//! options, and the output destination. Every section falls back to the
//! built-in defaults, so a config file only needs the fields it changes.
//!
//! Supports JSON and TOML, chosen by file extension.

use buddycheck_core::{DimensionSet, LabelFont, LabelSequence, MeshQuality, StlFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, SettingsError};

/// File name of the per-user default config.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Where and how the generated meshes are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory receiving the STL files (created if missing)
    pub directory: PathBuf,
    /// Prefix shared by the three output files
    pub file_stem: String,
    /// STL encoding
    pub format: StlFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("buddy_check_output"),
            file_stem: "buddy_check".to_string(),
            format: StlFormat::Binary,
        }
    }
}

impl OutputSettings {
    pub fn bottom_path(&self) -> PathBuf {
        self.directory.join(format!("{}_bottom.stl", self.file_stem))
    }

    pub fn lid_path(&self) -> PathBuf {
        self.directory.join(format!("{}_lid.stl", self.file_stem))
    }

    /// Lid flipped top-face-down for printing.
    pub fn lid_print_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}_lid_print_orientation.stl", self.file_stem))
    }
}

/// Complete generator configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dimensions: DimensionSet,
    /// Checklist labels, one per toggle
    pub labels: LabelSequence,
    pub label_font: LabelFont,
    pub quality: MeshQuality,
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-user config location, `<config dir>/buddycheck/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDirectory)?;
        Ok(dir.join("buddycheck").join(CONFIG_FILE_NAME))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match Self::extension(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else the per-user config if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Ok(default) if default.is_file() => Self::load_from_file(&default),
            _ => {
                debug!("No configuration file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match Self::extension(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.dimensions.validate()?;
        self.quality.validate()?;

        if self.output.file_stem.trim().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.file_stem".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if let LabelFont::System { family } = &self.label_font {
            if family.trim().is_empty() {
                return Err(SettingsError::InvalidSetting {
                    key: "label_font.family".to_string(),
                    reason: "must name a font family".to_string(),
                });
            }
        }

        Ok(())
    }

    fn extension(path: &Path) -> Result<ConfigFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

enum ConfigFormat {
    Json,
    Toml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_output_paths() {
        let output = OutputSettings {
            directory: PathBuf::from("/tmp/box"),
            ..Default::default()
        };
        assert_eq!(
            output.bottom_path(),
            PathBuf::from("/tmp/box/buddy_check_bottom.stl")
        );
        assert_eq!(output.lid_path(), PathBuf::from("/tmp/box/buddy_check_lid.stl"));
        assert_eq!(
            output.lid_print_path(),
            PathBuf::from("/tmp/box/buddy_check_lid_print_orientation.stl")
        );
    }

    #[test]
    fn test_empty_stem_rejected() {
        let mut config = Config::default();
        config.output.file_stem = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_empty_font_family_rejected() {
        let mut config = Config::default();
        config.label_font = LabelFont::System {
            family: String::new(),
        };
        assert!(config.validate().is_err());
        config.label_font = LabelFont::Bundled;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = Config::default()
            .save_to_file(Path::new("settings.yaml"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
labels = ["POWER", "NETWORK"]

[dimensions.toggles]
count = 4

[label_font]
kind = "bundled"
"#,
        )
        .unwrap();

        assert_eq!(config.dimensions.toggles.count, 4);
        assert_eq!(config.labels.resolve(4), vec!["POWER", "NETWORK", "ITEM 3", "ITEM 4"]);
        assert_eq!(config.label_font, LabelFont::Bundled);
        assert_eq!(config.output, OutputSettings::default());
        assert!(config.validate().is_ok());
    }
}
