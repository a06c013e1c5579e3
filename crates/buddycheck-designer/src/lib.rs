//! # BuddyCheck Designer
//!
//! Solid construction for the two enclosure parts and their STL export.
//!
//! Each part is described as a [`Recipe`]: a base feature followed by an
//! ordered list of unions and cuts. Every feature is a 2D [`Profile`] placed
//! on a [`WorkPlane`] and extruded along its normal, so the same positions
//! from the dimension set drive both the cutting tools and the ray casts that
//! verify them.

pub mod bottom;
pub mod error;
pub mod export;
pub mod glyphs;
pub mod inspect;
pub mod lid;
pub mod placement;
pub mod profile;
pub mod recipe;
pub mod solid;

pub use bottom::BottomBuilder;
pub use error::{ExportError, ExportResult, GeometryError, GeometryResult};
pub use export::{SolidExporter, StlExporter};
pub use glyphs::{glyph_source, GlyphOutline, GlyphSource, TextOutline, TrueTypeFont};
pub use inspect::{Bounds, MeshInspector};
pub use lid::LidBuilder;
pub use placement::{Placement, WorkPlane};
pub use profile::Profile;
pub use recipe::{BooleanOp, BuildContext, Feature, Recipe, Step};
pub use solid::{Solid, Triangle};
