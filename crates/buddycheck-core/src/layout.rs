//! Planar layout primitives shared by both builders.

use serde::{Deserialize, Serialize};

/// A point on the XY footprint, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle on the XY footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Footprint {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Footprint anchored at the origin.
    pub fn from_size(length: f64, width: f64) -> Self {
        Self::new(0.0, 0.0, length, width)
    }

    pub fn length(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn width(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> PlanarPoint {
        PlanarPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Shrink by `distance` on every side (negative grows).
    pub fn inset(&self, distance: f64) -> Self {
        Self::new(
            self.min_x + distance,
            self.min_y + distance,
            self.max_x - distance,
            self.max_y - distance,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.length() <= 0.0 || self.width() <= 0.0
    }

    /// True when `other` lies entirely inside (touching edges allowed).
    pub fn contains(&self, other: &Footprint) -> bool {
        const EPS: f64 = 1e-9;
        other.min_x >= self.min_x - EPS
            && other.min_y >= self.min_y - EPS
            && other.max_x <= self.max_x + EPS
            && other.max_y <= self.max_y + EPS
    }

    pub fn contains_point(&self, point: PlanarPoint) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    /// The four corners, counter-clockwise from the minimum corner.
    pub fn corners(&self) -> [PlanarPoint; 4] {
        [
            PlanarPoint::new(self.min_x, self.min_y),
            PlanarPoint::new(self.max_x, self.min_y),
            PlanarPoint::new(self.max_x, self.max_y),
            PlanarPoint::new(self.min_x, self.max_y),
        ]
    }
}
