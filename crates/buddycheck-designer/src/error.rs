//! Error types for solid construction and export.

use buddycheck_core::DimensionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A build step produced something that is not a printable solid.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// The parameter set was rejected before any geometry was built.
    #[error(transparent)]
    Dimensions(#[from] DimensionError),

    /// The solid has no faces left.
    #[error("'{0}' produced an empty solid")]
    Empty(String),

    /// A vertex coordinate is NaN or infinite.
    #[error("'{0}' produced non-finite coordinates")]
    NonFinite(String),

    /// Faces do not close up: part of the boundary is missing, overlapping
    /// or self-intersecting, so the result has no well-defined inside.
    #[error("'{name}' is not a closed surface ({open_area:.3} mm² left open)")]
    OpenSurface { name: String, open_area: f64 },

    /// The enclosed volume is zero or negative (inside-out or collapsed).
    #[error("'{name}' encloses a non-positive volume ({volume:.3} mm³)")]
    NonPositiveVolume { name: String, volume: f64 },

    /// A profile could not be turned into a closed outline.
    #[error("Invalid profile for '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    /// The font yields no outlines for a label.
    #[error("No glyph outlines for label '{0}'")]
    NoGlyphs(String),

    /// Font data could not be parsed.
    #[error("Font '{0}' could not be loaded")]
    Font(String),
}

/// A finished solid could not be written.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Refusing to export an empty mesh to {0}")]
    EmptyMesh(PathBuf),
}

impl ExportError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type GeometryResult<T> = Result<T, GeometryError>;
pub type ExportResult<T> = Result<T, ExportError>;
