//! Immutable solid wrapper over the `csgrs` mesh kernel.
//!
//! Every operation returns a new [`Solid`]; nothing is modified in place.

use csgrs::mesh::plane::Plane;
use csgrs::mesh::Mesh;
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use nalgebra::Point3;

use crate::error::{GeometryError, GeometryResult};
use crate::inspect::{Bounds, MeshInspector};
use crate::placement::{Placement, WorkPlane};

/// Leftover oriented area tolerated per unit of surface area before a mesh
/// counts as open.
const CLOSURE_TOLERANCE: f64 = 1e-7;

/// A triangle as three world-space corners, counter-clockwise seen from
/// outside the solid.
pub type Triangle = [Point3<f64>; 3];

/// Boundary-represented volume.
#[derive(Debug, Clone)]
pub struct Solid {
    mesh: Mesh<()>,
}

impl Solid {
    pub fn from_mesh(mesh: Mesh<()>) -> Self {
        Self { mesh }
    }

    /// Extrude a centred sketch `depth` along the placement's plane normal.
    pub fn extrude(sketch: &Sketch<()>, depth: f64, placement: &Placement) -> Self {
        let mesh = sketch.extrude(depth).transform(&placement.matrix(depth));
        Self { mesh }
    }

    pub fn union(&self, other: &Solid) -> Solid {
        Self {
            mesh: self.mesh.union(&other.mesh),
        }
    }

    pub fn difference(&self, other: &Solid) -> Solid {
        Self {
            mesh: self.mesh.difference(&other.mesh),
        }
    }

    /// Reflect across the plane parallel to `plane`'s sketch axes, `offset`
    /// along its normal.
    pub fn mirror(&self, plane: WorkPlane, offset: f64) -> Solid {
        Self {
            mesh: self.mesh.mirror(Plane::from_normal(plane.normal(), offset)),
        }
    }

    pub fn mesh(&self) -> &Mesh<()> {
        &self.mesh
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.polygons.is_empty()
    }

    pub fn polygon_count(&self) -> usize {
        self.mesh.polygons.len()
    }

    /// Fan-triangulate every face.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.mesh
            .polygons
            .iter()
            .filter(|polygon| polygon.vertices.len() >= 3)
            .flat_map(|polygon| polygon.triangulate())
            .map(|[a, b, c]| [a.pos, b.pos, c.pos])
            .collect()
    }

    pub fn inspect(&self) -> MeshInspector {
        MeshInspector::new(self.triangles())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(
            self.mesh
                .polygons
                .iter()
                .flat_map(|polygon| polygon.vertices.iter().map(|v| v.pos)),
        )
    }

    /// Enclosed volume in mm³.
    pub fn volume(&self) -> f64 {
        self.inspect().volume()
    }

    /// Reject a result that is not a printable solid.
    pub fn ensure_valid(self, name: &str) -> GeometryResult<Self> {
        if self.is_empty() {
            return Err(GeometryError::Empty(name.to_string()));
        }
        let finite = self.mesh.polygons.iter().all(|polygon| {
            polygon
                .vertices
                .iter()
                .all(|v| v.pos.coords.iter().all(|c| c.is_finite()))
        });
        if !finite {
            return Err(GeometryError::NonFinite(name.to_string()));
        }
        let shape = self.inspect();
        let open_area = shape.open_area();
        if open_area > CLOSURE_TOLERANCE * shape.surface_area().max(1.0) {
            return Err(GeometryError::OpenSurface {
                name: name.to_string(),
                open_area,
            });
        }
        let volume = shape.volume();
        if volume <= 0.0 {
            return Err(GeometryError::NonPositiveVolume {
                name: name.to_string(),
                volume,
            });
        }
        Ok(self)
    }
}
