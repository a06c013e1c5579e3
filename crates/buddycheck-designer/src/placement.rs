//! Work planes and placements.
//!
//! Every feature is a 2D profile sketched on one of three axis-aligned work
//! planes and extruded along that plane's normal. A [`Placement`] picks the
//! plane, the profile centre within it, and where along the normal the
//! extrusion starts.

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sketch plane and extrusion axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkPlane {
    /// Sketch in X/Y, extrude up along +Z (floor, lid, posts, vents)
    XY,
    /// Sketch in X/Z, extrude along +Y (front and rear walls)
    XZ,
    /// Sketch in Y/Z, extrude along +X (side walls)
    YZ,
}

impl WorkPlane {
    /// World direction of the sketch's first axis.
    pub fn u_axis(self) -> Vector3<f64> {
        match self {
            Self::XY | Self::XZ => Vector3::x(),
            Self::YZ => Vector3::y(),
        }
    }

    /// World direction of the sketch's second axis.
    pub fn v_axis(self) -> Vector3<f64> {
        match self {
            Self::XY => Vector3::y(),
            Self::XZ | Self::YZ => Vector3::z(),
        }
    }

    /// World direction of extrusion.
    pub fn normal(self) -> Vector3<f64> {
        match self {
            Self::XY => Vector3::z(),
            Self::XZ => Vector3::y(),
            Self::YZ => Vector3::x(),
        }
    }

    /// Rotation taking a sketch extruded along local +Z onto this plane.
    ///
    /// X/Z is the odd one out: `(u, v)` = `(X, Z)` with a `+Y` normal is
    /// left-handed, so the extrusion is mapped onto `-Y` and shifted back by
    /// the depth in [`Placement::matrix`].
    fn rotation(self) -> Matrix4<f64> {
        match self {
            Self::XY => Matrix4::identity(),
            Self::XZ => Matrix4::new(
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, -1.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
            Self::YZ => Matrix4::new(
                0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }
}

impl fmt::Display for WorkPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XY => write!(f, "XY"),
            Self::XZ => write!(f, "XZ"),
            Self::YZ => write!(f, "YZ"),
        }
    }
}

/// Where a profile sits: its centre `(u, v)` on the work plane and the
/// offset `w` along the plane normal at which extrusion begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub plane: WorkPlane,
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl Placement {
    pub fn new(plane: WorkPlane, u: f64, v: f64, w: f64) -> Self {
        Self { plane, u, v, w }
    }

    pub fn xy(x: f64, y: f64, z: f64) -> Self {
        Self::new(WorkPlane::XY, x, y, z)
    }

    /// Sketch on a front/rear wall; `y` is where the cut starts.
    pub fn xz(x: f64, z: f64, y: f64) -> Self {
        Self::new(WorkPlane::XZ, x, z, y)
    }

    /// Sketch on a side wall; `x` is where the cut starts.
    pub fn yz(y: f64, z: f64, x: f64) -> Self {
        Self::new(WorkPlane::YZ, y, z, x)
    }

    /// World point of the profile centre at extrusion start.
    pub fn origin(&self) -> Point3<f64> {
        Point3::from(
            self.plane.u_axis() * self.u + self.plane.v_axis() * self.v + self.plane.normal() * self.w,
        )
    }

    /// World point of the profile centre after extruding `depth`.
    pub fn end(&self, depth: f64) -> Point3<f64> {
        self.origin() + self.plane.normal() * depth
    }

    /// Transform taking a centred sketch extruded `depth` along local +Z into
    /// world space.
    pub fn matrix(&self, depth: f64) -> Matrix4<f64> {
        let shift = match self.plane {
            WorkPlane::XZ => Matrix4::new_translation(&Vector3::new(0.0, 0.0, -depth)),
            WorkPlane::XY | WorkPlane::YZ => Matrix4::identity(),
        };
        Matrix4::new_translation(&self.origin().coords) * self.plane.rotation() * shift
    }
}
