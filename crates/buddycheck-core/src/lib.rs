//! # BuddyCheck Core
//!
//! The parameter table shared by the bottom and lid builders: the dimension
//! set, the checklist label sequence, tessellation options, and every feature
//! position derived from them.
//!
//! This crate performs no geometry. It answers "where does each feature go"
//! and "is this parameter set buildable", so that both parts of the enclosure
//! read their positions from one place.

pub mod dimensions;
pub mod error;
pub mod labels;
pub mod layout;
pub mod options;
pub mod units;

pub use dimensions::{
    DimensionSet, LidDimensions, PostDimensions, RearConnector, ShellDimensions, SideConnectors,
    ToggleDimensions, VentDimensions, CUT_MARGIN, MIN_FILLET_RADIUS,
};
pub use error::{DimensionError, DimensionResult};
pub use labels::{fallback_label, LabelSequence, DEFAULT_LABELS};
pub use layout::{Footprint, PlanarPoint};
pub use options::{LabelFont, MeshQuality, StlFormat};
pub use units::{format_length, get_unit_label, mm_to_inches, MeasurementSystem};
