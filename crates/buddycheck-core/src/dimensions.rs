//! The dimension set: every length, count and spacing of the enclosure.
//!
//! Coordinates follow one convention for both parts. X runs left to right
//! along the front panel, Y runs from the front face (Y = 0) to the rear, and
//! Z runs up from the underside of the floor. The lid is modelled with its
//! plate occupying `0..lid.thickness` and its lip hanging below Z = 0.
//!
//! Nothing positional is stored twice. Toggle centres, connector and vent
//! positions, post corners, the ledge and the lip are all derived here so that
//! both builders read identical numbers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DimensionError, DimensionResult};
use crate::layout::{Footprint, PlanarPoint};

/// Extra length a through-cut extends past each face it penetrates.
pub const CUT_MARGIN: f64 = 0.1;

/// Smallest fillet radius applied after clamping.
pub const MIN_FILLET_RADIUS: f64 = 0.5;

/// Outer box and wall/floor stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellDimensions {
    /// Outer length along X (left to right)
    pub length: f64,
    /// Outer width along Y (front to back)
    pub width: f64,
    /// Overall height of the closed box
    pub height: f64,
    pub wall_thickness: f64,
    pub floor_thickness: f64,
    /// Radius applied to the four vertical outer edges
    pub fillet_radius: f64,
}

impl Default for ShellDimensions {
    fn default() -> Self {
        Self {
            length: 171.45,
            width: 76.2,
            height: 38.1,
            wall_thickness: 2.5,
            floor_thickness: 2.5,
            fillet_radius: 2.0,
        }
    }
}

/// Lid plate, lip and fastener recesses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LidDimensions {
    /// Plate thickness
    pub thickness: f64,
    /// How far the lip hangs below the plate; also removed from the shell height
    pub inset_depth: f64,
    /// Clearance between the lip and the ledge channel on every side
    pub gap: f64,
    /// How far the ledge ring reaches into the wall from its inner face
    pub ledge_overlap: f64,
    /// Fastener clearance hole diameter
    pub screw_clearance_diameter: f64,
    pub counterbore_diameter: f64,
    pub counterbore_depth: f64,
}

impl Default for LidDimensions {
    fn default() -> Self {
        Self {
            thickness: 3.0,
            inset_depth: 4.0,
            gap: 0.3,
            ledge_overlap: 1.2,
            screw_clearance_diameter: 3.4,
            counterbore_diameter: 6.0,
            counterbore_depth: 1.5,
        }
    }
}

/// Front-panel toggles, their lid light holes and their labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleDimensions {
    pub count: usize,
    pub diameter: f64,
    /// Height of the toggle centres above the underside
    pub z: f64,
    /// Centre of the first toggle
    pub x_start: f64,
    /// Centre of the last toggle
    pub x_end: f64,
    /// Light-pass hole diameter in the lid
    pub led_diameter: f64,
    /// Light-pass hole distance from the front edge of the lid
    pub led_y: f64,
    /// Label font size
    pub text_size: f64,
    /// Label centre height above the toggle centre
    pub text_z_above: f64,
}

impl Default for ToggleDimensions {
    fn default() -> Self {
        let shell = ShellDimensions::default();
        Self {
            count: 8,
            diameter: 6.2,
            z: shell.height / 2.0,
            x_start: 16.0,
            x_end: shell.length - 16.0,
            led_diameter: 3.2,
            led_y: 10.0,
            text_size: 3.0,
            text_z_above: 9.0,
        }
    }
}

/// Single input connector in the rear wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RearConnector {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub z: f64,
}

impl Default for RearConnector {
    fn default() -> Self {
        let shell = ShellDimensions::default();
        Self {
            width: 9.5,
            height: 3.8,
            x: shell.length / 2.0,
            z: shell.height / 2.0 - 3.0,
        }
    }
}

/// Output connectors in the right-hand wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideConnectors {
    pub count: usize,
    /// Opening size along Y
    pub width: f64,
    /// Opening size along Z
    pub height: f64,
    /// Centre-to-centre distance
    pub spacing: f64,
    /// Centre of the group along Y
    pub y: f64,
    pub z: f64,
}

impl Default for SideConnectors {
    fn default() -> Self {
        let shell = ShellDimensions::default();
        Self {
            count: 2,
            width: 14.5,
            height: 7.5,
            spacing: 20.0,
            y: shell.width / 2.0,
            z: shell.height / 2.0 - 3.0,
        }
    }
}

/// Floor ventilation slots, centred on the footprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VentDimensions {
    pub count: usize,
    /// Slot size along X
    pub width: f64,
    /// Slot size along Y
    pub length: f64,
    pub spacing: f64,
}

impl Default for VentDimensions {
    fn default() -> Self {
        Self {
            count: 5,
            width: 2.0,
            length: 30.0,
            spacing: 8.0,
        }
    }
}

/// Corner screw posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostDimensions {
    pub outer_diameter: f64,
    /// Fastener bore diameter
    pub inner_diameter: f64,
    /// Distance of each post centre from the two nearest outer faces
    pub inset: f64,
}

impl Default for PostDimensions {
    fn default() -> Self {
        Self {
            outer_diameter: 7.0,
            inner_diameter: 3.0,
            inset: 8.0,
        }
    }
}

/// Complete, immutable parameter table for both parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionSet {
    pub shell: ShellDimensions,
    pub lid: LidDimensions,
    pub toggles: ToggleDimensions,
    pub rear_connector: RearConnector,
    pub side_connectors: SideConnectors,
    pub vents: VentDimensions,
    pub posts: PostDimensions,
}

/// Offset of item `index` in a row of `count` items centred on zero.
fn centered_offset(index: usize, count: usize, spacing: f64) -> f64 {
    (index as f64 - (count as f64 - 1.0) / 2.0) * spacing
}

impl DimensionSet {
    /// Height of the bottom shell (the lid takes up the rest).
    pub fn bottom_height(&self) -> f64 {
        self.shell.height - self.lid.inset_depth
    }

    /// Fillet of the inner cavity, clamped so it never goes degenerate.
    pub fn inner_fillet_radius(&self) -> f64 {
        (self.shell.fillet_radius - self.shell.wall_thickness / 2.0).max(MIN_FILLET_RADIUS)
    }

    /// Fillet of the lid lip, clamped like the cavity fillet.
    pub fn lip_fillet_radius(&self) -> f64 {
        (self.shell.fillet_radius - self.shell.wall_thickness).max(MIN_FILLET_RADIUS)
    }

    pub fn outer_footprint(&self) -> Footprint {
        Footprint::from_size(self.shell.length, self.shell.width)
    }

    /// Footprint of the cavity inside the walls.
    pub fn cavity_footprint(&self) -> Footprint {
        self.outer_footprint().inset(self.shell.wall_thickness)
    }

    // ---- ledge and lip ------------------------------------------------

    /// Bottom of the ledge band at the top of the shell.
    pub fn ledge_z(&self) -> f64 {
        self.bottom_height() - self.lid.thickness
    }

    /// Height at which the underside of the seated lid lip sits.
    pub fn seat_z(&self) -> f64 {
        self.bottom_height() - self.lid.inset_depth
    }

    /// Inset of the lid lip from the outer faces.
    pub fn lip_inset(&self) -> f64 {
        self.shell.wall_thickness + self.lid.gap
    }

    pub fn lip_footprint(&self) -> Footprint {
        self.outer_footprint().inset(self.lip_inset())
    }

    /// Inset of the ledge ring's outer boundary.
    pub fn ledge_outer_inset(&self) -> f64 {
        self.shell.wall_thickness - self.lid.ledge_overlap
    }

    pub fn ledge_footprint(&self) -> Footprint {
        self.outer_footprint().inset(self.ledge_outer_inset())
    }

    /// Inset of the channel the lip seats in: one gap wider than the lip.
    pub fn ledge_channel_inset(&self) -> f64 {
        self.lip_inset() - self.lid.gap
    }

    pub fn ledge_channel_footprint(&self) -> Footprint {
        self.outer_footprint().inset(self.ledge_channel_inset())
    }

    // ---- toggles --------------------------------------------------------

    /// Centre-to-centre toggle spacing (zero for a single toggle).
    pub fn toggle_spacing(&self) -> f64 {
        let t = &self.toggles;
        if t.count < 2 {
            0.0
        } else {
            (t.x_end - t.x_start) / (t.count - 1) as f64
        }
    }

    /// X centre of toggle `index`, interpolated so the first and last land
    /// exactly on `x_start` and `x_end`.
    pub fn toggle_x(&self, index: usize) -> f64 {
        let t = &self.toggles;
        if t.count < 2 {
            return t.x_start;
        }
        let f = index as f64 / (t.count - 1) as f64;
        t.x_start * (1.0 - f) + t.x_end * f
    }

    pub fn toggle_positions(&self) -> Vec<f64> {
        (0..self.toggles.count).map(|i| self.toggle_x(i)).collect()
    }

    /// Height of the label centres on the front wall.
    pub fn label_z(&self) -> f64 {
        self.toggles.z + self.toggles.text_z_above
    }

    /// Positions of the lid light-pass holes.
    pub fn led_positions(&self) -> Vec<PlanarPoint> {
        self.toggle_positions()
            .into_iter()
            .map(|x| PlanarPoint::new(x, self.toggles.led_y))
            .collect()
    }

    // ---- connectors, vents, posts ----------------------------------------

    pub fn side_connector_y(&self, index: usize) -> f64 {
        let s = &self.side_connectors;
        s.y + centered_offset(index, s.count, s.spacing)
    }

    pub fn side_connector_positions(&self) -> Vec<f64> {
        (0..self.side_connectors.count)
            .map(|i| self.side_connector_y(i))
            .collect()
    }

    /// X centre of vent slot `index`; the row is centred on the footprint.
    pub fn vent_x(&self, index: usize) -> f64 {
        let v = &self.vents;
        self.shell.length / 2.0 + centered_offset(index, v.count, v.spacing)
    }

    pub fn vent_positions(&self) -> Vec<f64> {
        (0..self.vents.count).map(|i| self.vent_x(i)).collect()
    }

    /// Post centres: front-left, front-right, rear-left, rear-right.
    pub fn corner_positions(&self) -> [PlanarPoint; 4] {
        let inset = self.posts.inset;
        let (l, w) = (self.shell.length, self.shell.width);
        [
            PlanarPoint::new(inset, inset),
            PlanarPoint::new(l - inset, inset),
            PlanarPoint::new(inset, w - inset),
            PlanarPoint::new(l - inset, w - inset),
        ]
    }

    /// Top of the screw posts: the lower of the ledge and the lid seat, so a
    /// seated lid rests on the posts without fouling them.
    pub fn post_top_z(&self) -> f64 {
        self.ledge_z().min(self.seat_z())
    }

    pub fn post_height(&self) -> f64 {
        self.post_top_z() - self.shell.floor_thickness
    }

    // ---- validation -----------------------------------------------------

    /// Check that every derived feature lies inside the envelope and that
    /// neighbouring features do not overlap.
    pub fn validate(&self) -> DimensionResult<()> {
        self.validate_positive()?;
        self.validate_shell()?;
        self.validate_toggles()?;
        self.validate_connectors()?;
        self.validate_vents()?;
        self.validate_posts()?;
        debug!(
            toggles = self.toggles.count,
            spacing = self.toggle_spacing(),
            "Dimension set validated"
        );
        Ok(())
    }

    fn validate_positive(&self) -> DimensionResult<()> {
        let s = &self.shell;
        let l = &self.lid;
        let t = &self.toggles;
        let r = &self.rear_connector;
        let c = &self.side_connectors;
        let v = &self.vents;
        let p = &self.posts;
        let values = [
            ("shell.length", s.length),
            ("shell.width", s.width),
            ("shell.height", s.height),
            ("shell.wall_thickness", s.wall_thickness),
            ("shell.floor_thickness", s.floor_thickness),
            ("shell.fillet_radius", s.fillet_radius),
            ("lid.thickness", l.thickness),
            ("lid.inset_depth", l.inset_depth),
            ("lid.gap", l.gap),
            ("lid.ledge_overlap", l.ledge_overlap),
            ("lid.screw_clearance_diameter", l.screw_clearance_diameter),
            ("lid.counterbore_diameter", l.counterbore_diameter),
            ("lid.counterbore_depth", l.counterbore_depth),
            ("toggles.diameter", t.diameter),
            ("toggles.led_diameter", t.led_diameter),
            ("toggles.text_size", t.text_size),
            ("rear_connector.width", r.width),
            ("rear_connector.height", r.height),
            ("side_connectors.width", c.width),
            ("side_connectors.height", c.height),
            ("vents.width", v.width),
            ("vents.length", v.length),
            ("posts.outer_diameter", p.outer_diameter),
            ("posts.inner_diameter", p.inner_diameter),
            ("posts.inset", p.inset),
        ];
        for (name, value) in values {
            if value <= 0.0 || !value.is_finite() {
                return Err(DimensionError::not_positive(name, value));
            }
        }
        if t.count < 1 {
            return Err(DimensionError::CountTooSmall {
                name: "toggles.count".to_string(),
                value: t.count,
                min: 1,
            });
        }
        Ok(())
    }

    fn validate_shell(&self) -> DimensionResult<()> {
        let s = &self.shell;
        let wall = s.wall_thickness;

        if 2.0 * wall >= s.length.min(s.width) {
            return Err(DimensionError::out_of_range(
                "shell.wall_thickness",
                wall,
                0.0,
                s.length.min(s.width) / 2.0,
            ));
        }
        if self.lid.inset_depth >= s.height {
            return Err(DimensionError::out_of_range(
                "lid.inset_depth",
                self.lid.inset_depth,
                0.0,
                s.height,
            ));
        }
        if self.ledge_z() <= s.floor_thickness || self.seat_z() <= s.floor_thickness {
            return Err(DimensionError::OutsideEnvelope(format!(
                "lid lip and ledge ({:.2}mm) reach down to the floor ({:.2}mm)",
                self.post_top_z(),
                s.floor_thickness
            )));
        }
        if self.lid.ledge_overlap >= wall {
            return Err(DimensionError::out_of_range(
                "lid.ledge_overlap",
                self.lid.ledge_overlap,
                0.0,
                wall,
            ));
        }
        // The ledge ring's square corners must stay inside the rounded outer corners.
        let corner_clearance = s.fillet_radius * (1.0 - std::f64::consts::FRAC_1_SQRT_2);
        if self.ledge_outer_inset() < corner_clearance {
            return Err(DimensionError::OutsideEnvelope(format!(
                "ledge ring corner (inset {:.2}mm) pokes through the {:.2}mm outer fillet",
                self.ledge_outer_inset(),
                s.fillet_radius
            )));
        }
        if self.lip_footprint().is_empty() {
            return Err(DimensionError::OutsideEnvelope(
                "lid lip has no area left after the wall and gap inset".to_string(),
            ));
        }
        if !self
            .ledge_channel_footprint()
            .inset(self.lid.gap)
            .contains(&self.lip_footprint())
        {
            return Err(DimensionError::Overlap(
                "lid lip does not clear the ledge channel".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_toggles(&self) -> DimensionResult<()> {
        let s = &self.shell;
        let t = &self.toggles;
        let r = t.diameter / 2.0;

        if t.x_start > t.x_end {
            return Err(DimensionError::out_of_range(
                "toggles.x_start",
                t.x_start,
                0.0,
                t.x_end,
            ));
        }
        if t.x_start - r < s.wall_thickness || t.x_end + r > s.length - s.wall_thickness {
            return Err(DimensionError::OutsideEnvelope(format!(
                "toggle holes span {:.2}..{:.2}mm, front panel is {:.2}..{:.2}mm",
                t.x_start - r,
                t.x_end + r,
                s.wall_thickness,
                s.length - s.wall_thickness
            )));
        }
        if t.count > 1 && self.toggle_spacing() <= t.diameter {
            return Err(DimensionError::Overlap(format!(
                "toggle spacing {:.2}mm does not exceed toggle diameter {:.2}mm",
                self.toggle_spacing(),
                t.diameter
            )));
        }
        if t.z - r < s.floor_thickness || t.z + r > self.ledge_z() {
            return Err(DimensionError::out_of_range(
                "toggles.z",
                t.z,
                s.floor_thickness + r,
                self.ledge_z() - r,
            ));
        }
        let label_top = self.label_z() + t.text_size / 2.0;
        if label_top > self.ledge_z() {
            return Err(DimensionError::OutsideEnvelope(format!(
                "labels reach {:.2}mm, above the ledge at {:.2}mm",
                label_top,
                self.ledge_z()
            )));
        }
        if self.label_z() - t.text_size / 2.0 < t.z + r {
            return Err(DimensionError::Overlap(
                "labels overlap the toggle holes".to_string(),
            ));
        }
        let led_r = t.led_diameter / 2.0;
        let lip = self.lip_footprint();
        if t.led_y - led_r < lip.min_y || t.led_y + led_r > lip.max_y {
            return Err(DimensionError::out_of_range(
                "toggles.led_y",
                t.led_y,
                lip.min_y + led_r,
                lip.max_y - led_r,
            ));
        }
        if t.count > 1 && self.toggle_spacing() <= t.led_diameter {
            return Err(DimensionError::Overlap(
                "light-pass holes overlap each other".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_connectors(&self) -> DimensionResult<()> {
        let s = &self.shell;
        let wall = s.wall_thickness;
        let r = &self.rear_connector;

        if r.x - r.width / 2.0 < wall || r.x + r.width / 2.0 > s.length - wall {
            return Err(DimensionError::out_of_range(
                "rear_connector.x",
                r.x,
                wall + r.width / 2.0,
                s.length - wall - r.width / 2.0,
            ));
        }
        if r.z - r.height / 2.0 < s.floor_thickness || r.z + r.height / 2.0 > self.ledge_z() {
            return Err(DimensionError::out_of_range(
                "rear_connector.z",
                r.z,
                s.floor_thickness + r.height / 2.0,
                self.ledge_z() - r.height / 2.0,
            ));
        }

        let c = &self.side_connectors;
        if c.count == 0 {
            return Ok(());
        }
        if c.count > 1 && c.spacing <= c.width {
            return Err(DimensionError::Overlap(format!(
                "side connector spacing {:.2}mm does not exceed width {:.2}mm",
                c.spacing, c.width
            )));
        }
        let first = self.side_connector_y(0) - c.width / 2.0;
        let last = self.side_connector_y(c.count - 1) + c.width / 2.0;
        if first < wall || last > s.width - wall {
            return Err(DimensionError::OutsideEnvelope(format!(
                "side connectors span {:.2}..{:.2}mm, side panel is {:.2}..{:.2}mm",
                first,
                last,
                wall,
                s.width - wall
            )));
        }
        if c.z - c.height / 2.0 < s.floor_thickness || c.z + c.height / 2.0 > self.ledge_z() {
            return Err(DimensionError::out_of_range(
                "side_connectors.z",
                c.z,
                s.floor_thickness + c.height / 2.0,
                self.ledge_z() - c.height / 2.0,
            ));
        }
        Ok(())
    }

    fn validate_vents(&self) -> DimensionResult<()> {
        let v = &self.vents;
        if v.count == 0 {
            return Ok(());
        }
        let cavity = self.cavity_footprint();
        if v.count > 1 && v.spacing <= v.width {
            return Err(DimensionError::Overlap(format!(
                "vent spacing {:.2}mm does not exceed slot width {:.2}mm",
                v.spacing, v.width
            )));
        }
        let first = self.vent_x(0) - v.width / 2.0;
        let last = self.vent_x(v.count - 1) + v.width / 2.0;
        if first < cavity.min_x || last > cavity.max_x || v.length > cavity.width() {
            return Err(DimensionError::OutsideEnvelope(
                "vent slots extend under the walls".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_posts(&self) -> DimensionResult<()> {
        let p = &self.posts;
        let l = &self.lid;
        let outer_r = p.outer_diameter / 2.0;

        if p.inner_diameter >= p.outer_diameter {
            return Err(DimensionError::out_of_range(
                "posts.inner_diameter",
                p.inner_diameter,
                0.0,
                p.outer_diameter,
            ));
        }
        if p.inset <= outer_r {
            return Err(DimensionError::Overlap(format!(
                "post inset {:.2}mm does not exceed post radius {:.2}mm",
                p.inset, outer_r
            )));
        }
        if 2.0 * p.inset >= self.shell.length.min(self.shell.width) {
            return Err(DimensionError::OutsideEnvelope(
                "posts on opposite corners collide".to_string(),
            ));
        }
        if self.post_height() <= 0.0 {
            return Err(DimensionError::not_positive("posts.height", self.post_height()));
        }
        if l.counterbore_diameter <= l.screw_clearance_diameter {
            return Err(DimensionError::out_of_range(
                "lid.counterbore_diameter",
                l.counterbore_diameter,
                l.screw_clearance_diameter,
                f64::INFINITY,
            ));
        }
        if l.counterbore_depth >= l.thickness {
            return Err(DimensionError::out_of_range(
                "lid.counterbore_depth",
                l.counterbore_depth,
                0.0,
                l.thickness,
            ));
        }
        let lip = self.lip_footprint();
        for corner in self.corner_positions() {
            if !lip.contains_point(corner) {
                return Err(DimensionError::OutsideEnvelope(format!(
                    "corner hole at ({:.2}, {:.2}) misses the lid lip",
                    corner.x, corner.y
                )));
            }
        }
        Ok(())
    }
}
