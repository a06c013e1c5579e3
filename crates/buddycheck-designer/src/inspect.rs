//! Measurements on triangulated solids: bounds, volume, closure and ray casts.
//!
//! Ray casts are how through-cuts are verified: a ray along a cut's axis
//! through its centre must not cross any surface inside the wall.

use nalgebra::{Point3, Vector3};

use crate::solid::Triangle;

const RAY_EPSILON: f64 = 1e-9;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| Self {
                min: b.min.inf(&p),
                max: b.max.sup(&p),
            },
        ))
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Triangle soup with ray and volume queries.
#[derive(Debug, Clone)]
pub struct MeshInspector {
    triangles: Vec<Triangle>,
}

impl MeshInspector {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Signed volume by the divergence theorem.
    pub fn volume(&self) -> f64 {
        self.volume_about(Point3::origin())
    }

    /// Signed volume of the cones from `apex` to every triangle. Equal to
    /// [`volume`](Self::volume) for any apex only when the surface is closed.
    pub fn volume_about(&self, apex: Point3<f64>) -> f64 {
        self.triangles
            .iter()
            .map(|[a, b, c]| (a - apex).dot(&(b - apex).cross(&(c - apex))))
            .sum::<f64>()
            / 6.0
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm())
            .sum::<f64>()
            / 2.0
    }

    /// Largest net flux of a set of divergence-free fields through the
    /// surface. By the divergence theorem every closed surface gives zero;
    /// a gap leaves the flux through the missing patch.
    ///
    /// Constant fields see gaps with a net projected area. The linear ones
    /// also see gaps that enclose no net area, such as a missing band of
    /// cylinder wall between two intact caps. Positions are taken about the
    /// bounding-box centre and scaled by its half-diagonal, so the result is
    /// an area in mm² whatever the part's size.
    pub fn open_area(&self) -> f64 {
        let Some(bounds) = Bounds::from_points(self.triangles.iter().flatten().copied()) else {
            return 0.0;
        };
        let centre = bounds.center();
        let scale = (bounds.size().norm() / 2.0).max(f64::EPSILON);

        let mut flux = [0.0_f64; FIELD_COUNT];
        for [a, b, c] in &self.triangles {
            let area = (b - a).cross(&(c - a)) / 2.0;
            // Linear fields integrate exactly at the centroid.
            let p = ((a.coords + b.coords + c.coords) / 3.0 - centre.coords) / scale;
            for (total, field) in flux.iter_mut().zip(divergence_free_fields(&p)) {
                *total += field.dot(&area);
            }
        }
        flux.iter().fold(0.0, |max, f| max.max(f.abs()))
    }

    /// Distances along `direction` (normalised internally) at which the
    /// segment from `origin` of length `length` crosses the surface, sorted
    /// and with coincident hits on shared edges merged.
    pub fn hits(&self, origin: Point3<f64>, direction: Vector3<f64>, length: f64) -> Vec<f64> {
        let dir = direction.normalize();
        let mut hits: Vec<f64> = self
            .triangles
            .iter()
            .filter_map(|tri| intersect(origin, dir, tri))
            .filter(|t| *t >= 0.0 && *t <= length)
            .collect();
        hits.sort_by(f64::total_cmp);
        hits.dedup_by(|a, b| (*a - *b).abs() < 1e-7);
        hits
    }

    /// Hits along the straight segment between two points.
    pub fn hits_between(&self, from: Point3<f64>, to: Point3<f64>) -> Vec<f64> {
        let span = to - from;
        self.hits(from, span, span.norm())
    }

    /// Parity test along a slightly skewed ray, to stay clear of edges.
    pub fn contains(&self, point: Point3<f64>) -> bool {
        let dir = Vector3::new(1.0, 0.000_731, 0.000_419);
        self.hits(point, dir, f64::INFINITY).len() % 2 == 1
    }
}

const FIELD_COUNT: usize = 11;

/// The constant fields and a basis of the traceless linear ones at `p`.
fn divergence_free_fields(p: &Vector3<f64>) -> [Vector3<f64>; FIELD_COUNT] {
    let (x, y, z) = (p.x, p.y, p.z);
    [
        Vector3::x(),
        Vector3::y(),
        Vector3::z(),
        Vector3::new(x, -y, 0.0),
        Vector3::new(0.0, y, -z),
        Vector3::new(y, 0.0, 0.0),
        Vector3::new(z, 0.0, 0.0),
        Vector3::new(0.0, x, 0.0),
        Vector3::new(0.0, z, 0.0),
        Vector3::new(0.0, 0.0, x),
        Vector3::new(0.0, 0.0, y),
    ]
}

/// Möller–Trumbore ray/triangle intersection.
fn intersect(origin: Point3<f64>, dir: Vector3<f64>, [a, b, c]: &Triangle) -> Option<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv = 1.0 / det;
    let s = origin - a;
    let u = s.dot(&p) * inv;
    if !(-RAY_EPSILON..=1.0 + RAY_EPSILON).contains(&u) {
        return None;
    }
    let q = s.cross(&e1);
    let v = dir.dot(&q) * inv;
    if v < -RAY_EPSILON || u + v > 1.0 + RAY_EPSILON {
        return None;
    }
    Some(e2.dot(&q) * inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit cube as 12 outward-facing triangles.
    fn cube() -> MeshInspector {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let quads = [
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
        ];
        MeshInspector::new(
            quads
                .iter()
                .flat_map(|[a, b, c, d]| [[*a, *b, *c], [*a, *c, *d]])
                .collect(),
        )
    }

    #[test]
    fn test_cube_volume() {
        let cube = cube();
        assert_eq!(cube.triangle_count(), 12);
        assert!((cube.volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_closed_cube_has_no_open_area() {
        let cube = cube();
        assert!((cube.surface_area() - 6.0).abs() < 1e-12);
        assert!(cube.open_area() < 1e-12);
        let shifted = cube.volume_about(Point3::new(500.0, -300.0, 700.0));
        assert!((shifted - cube.volume()).abs() < 1e-9);
    }

    #[test]
    fn test_missing_face_is_detected() {
        let mut triangles = cube().triangles;
        // Drop the two triangles of the top face.
        triangles.drain(2..4);
        let open = MeshInspector::new(triangles);

        assert!((open.open_area() - 1.0).abs() < 1e-12);
        let shifted = open.volume_about(Point3::new(0.0, 0.0, 5.0));
        assert!((shifted - open.volume()).abs() > 1.0);
    }

    /// Hexagonal prism of radius 1 from z = 0 to z = `height`, returned as
    /// (caps, side wall).
    fn prism(height: f64) -> (Vec<Triangle>, Vec<Triangle>) {
        let ring = |z: f64| -> Vec<Point3<f64>> {
            (0..6)
                .map(|i| {
                    let theta = std::f64::consts::TAU * i as f64 / 6.0;
                    Point3::new(theta.cos(), theta.sin(), z)
                })
                .collect()
        };
        let (bottom, top) = (ring(0.0), ring(height));
        let (b0, t0) = (Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, height));

        let mut caps = Vec::new();
        let mut side = Vec::new();
        for i in 0..6 {
            let j = (i + 1) % 6;
            caps.push([b0, bottom[j], bottom[i]]);
            caps.push([t0, top[i], top[j]]);
            side.push([bottom[i], bottom[j], top[j]]);
            side.push([bottom[i], top[j], top[i]]);
        }
        (caps, side)
    }

    #[test]
    fn test_prism_is_closed() {
        let (mut triangles, side) = prism(5.0);
        triangles.extend(side);
        let prism = MeshInspector::new(triangles);
        assert!(prism.volume() > 0.0);
        assert!(prism.open_area() < 1e-12, "open area {}", prism.open_area());
    }

    #[test]
    fn test_missing_side_wall_is_detected() {
        let (caps, _) = prism(5.0);
        let open = MeshInspector::new(caps);

        // The caps' oriented areas cancel, so apex-independent volume alone
        // cannot tell.
        let shifted = open.volume_about(Point3::new(30.0, -20.0, 0.0));
        assert!((shifted - open.volume()).abs() < 1e-9);
        assert!(open.open_area() > 0.5, "open area {}", open.open_area());
    }

    #[test]
    fn test_ray_through_cube() {
        let hits = cube().hits(Point3::new(-1.0, 0.3, 0.6), Vector3::x(), 5.0);
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - 1.0).abs() < 1e-12);
        assert!((hits[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_stops_short() {
        let hits = cube().hits_between(Point3::new(0.5, 0.5, -1.0), Point3::new(0.5, 0.5, 0.5));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_ray_misses() {
        let hits = cube().hits(Point3::new(-1.0, 2.0, 0.5), Vector3::x(), 5.0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_contains() {
        let cube = cube();
        assert!(cube.contains(Point3::new(0.5, 0.5, 0.5)));
        assert!(!cube.contains(Point3::new(1.5, 0.5, 0.5)));
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::from_points([
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.size(), Vector3::new(2.0, 6.0, 3.0));
        assert_eq!(bounds.center(), Point3::new(0.0, 1.0, 1.5));
        assert!(Bounds::from_points(Vec::new()).is_none());
    }
}
