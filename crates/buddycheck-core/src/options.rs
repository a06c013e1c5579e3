//! Tessellation, lettering and mesh-encoding options.
//!
//! These do not move any feature; they only control how finely curved
//! profiles are faceted, which outlines are used for label cutouts, and how
//! the finished meshes are encoded.

use serde::{Deserialize, Serialize};

use crate::error::{DimensionError, DimensionResult};

/// Faceting used when curved profiles are turned into polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshQuality {
    /// Segments used for a full circle (holes, posts)
    pub circle_segments: usize,
    /// Segments used for each quarter-round fillet corner
    pub fillet_segments: usize,
}

impl Default for MeshQuality {
    fn default() -> Self {
        Self {
            circle_segments: 48,
            fillet_segments: 8,
        }
    }
}

impl MeshQuality {
    /// Coarse faceting, used by tests and previews.
    pub fn draft() -> Self {
        Self {
            circle_segments: 16,
            fillet_segments: 2,
        }
    }

    pub fn validate(&self) -> DimensionResult<()> {
        if self.circle_segments < 8 {
            return Err(DimensionError::CountTooSmall {
                name: "quality.circle_segments".to_string(),
                value: self.circle_segments,
                min: 8,
            });
        }
        if self.fillet_segments < 1 {
            return Err(DimensionError::CountTooSmall {
                name: "quality.fillet_segments".to_string(),
                value: self.fillet_segments,
                min: 1,
            });
        }
        Ok(())
    }
}

/// Outline source for the glow-through label cutouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LabelFont {
    /// The typeface compiled into the generator; identical on every host
    Bundled,
    /// A font looked up from the system font database by family name
    System { family: String },
}

impl Default for LabelFont {
    fn default() -> Self {
        Self::System {
            family: "Arial".to_string(),
        }
    }
}

impl std::fmt::Display for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled"),
            Self::System { family } => write!(f, "system:{}", family),
        }
    }
}

/// STL encoding of the exported meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

impl std::fmt::Display for StlFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Ascii => write!(f, "ascii"),
        }
    }
}

impl std::str::FromStr for StlFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "bin" => Ok(Self::Binary),
            "ascii" | "text" => Ok(Self::Ascii),
            _ => Err(format!("Unknown STL format: {}", s)),
        }
    }
}
