//! Glyph outlines for the label cutouts.
//!
//! A [`GlyphSource`] turns a label into closed 2D contours, centred on the
//! origin, with +Y up. System fonts are found through `fontdb`; the bundled
//! Tuffy face is used when none resolves. Both are outlined with `rusttype`.
//!
//! Labels are cut clean through a wall, so every counter (the inside of an
//! "O", "A" or "8") would fall out. [`GlyphOutline::bridges`] gives the
//! stencil strips that tie each counter back to the surrounding wall.

use buddycheck_core::LabelFont;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};
use std::fs;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::{GeometryError, GeometryResult};

/// Closed polyline; the closing edge back to the first point is implicit.
pub type Contour = Vec<[f64; 2]>;

/// Segments used to flatten each quadratic curve.
const QUAD_STEPS: usize = 6;
/// Segments used to flatten each cubic curve.
const CUBIC_STEPS: usize = 8;
/// Stencil bridge width as a fraction of the font size.
pub const BRIDGE_WIDTH: f64 = 0.12;

/// Public-domain Tuffy Regular, used when no system font resolves.
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/tuffy/Tuffy.ttf");
const BUNDLED_FAMILY: &str = "Tuffy";

/// Filled regions of one glyph and the counters cut out of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    pub outers: Vec<Contour>,
    pub holes: Vec<Contour>,
}

impl GlyphOutline {
    /// Sort raw contours into outers and holes.
    ///
    /// The contour enclosing the most area is always an outer; contours
    /// wound the same way are outers too, the rest are holes.
    pub fn classify(contours: Vec<Contour>) -> Self {
        let contours: Vec<Contour> = contours.into_iter().filter(|c| c.len() >= 3).collect();
        let dominant = contours
            .iter()
            .map(|c| signed_area(c))
            .fold(0.0_f64, |acc, a| if a.abs() > acc.abs() { a } else { acc });

        let mut glyph = Self::default();
        for contour in contours {
            if signed_area(&contour) * dominant >= 0.0 {
                glyph.outers.push(contour);
            } else {
                glyph.holes.push(contour);
            }
        }
        glyph
    }

    /// Split into one outline per filled region, each carrying the counters
    /// that lie inside it. Regions are cut one at a time.
    pub fn pieces(&self) -> Vec<GlyphOutline> {
        self.outers
            .iter()
            .map(|outer| GlyphOutline {
                outers: vec![outer.clone()],
                holes: self
                    .holes
                    .iter()
                    .filter(|hole| hole.first().is_some_and(|p| contains_point(outer, *p)))
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    fn points(&self) -> impl Iterator<Item = &[f64; 2]> {
        self.outers.iter().chain(self.holes.iter()).flatten()
    }

    /// One vertical strip per counter, `width` wide, centred on the counter
    /// and running past the top and bottom of the glyph. Removing the strips
    /// from the glyph leaves wall material joining each counter to the wall
    /// above and below it.
    pub fn bridges(&self, width: f64) -> Vec<Contour> {
        let Some((min, max)) = contour_bounds(self.outers.iter().flatten()) else {
            return Vec::new();
        };
        let (bottom, top) = (min[1] - width, max[1] + width);
        self.holes
            .iter()
            .filter_map(|hole| contour_bounds(hole.iter()))
            .map(|(hmin, hmax)| {
                let x = (hmin[0] + hmax[0]) / 2.0;
                let (x0, x1) = (x - width / 2.0, x + width / 2.0);
                vec![[x0, bottom], [x1, bottom], [x1, top], [x0, top]]
            })
            .collect()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for contour in self.outers.iter_mut().chain(self.holes.iter_mut()) {
            for p in contour.iter_mut() {
                p[0] += dx;
                p[1] += dy;
            }
        }
    }
}

/// The outlines of a whole label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOutline {
    pub glyphs: Vec<GlyphOutline>,
}

impl TextOutline {
    pub fn is_empty(&self) -> bool {
        self.glyphs.iter().all(|g| g.outers.is_empty())
    }

    /// Total number of counters across all glyphs.
    pub fn counter_count(&self) -> usize {
        self.glyphs.iter().map(|g| g.holes.len()).sum()
    }

    /// `(min, max)` corners of the outline, if it has any points.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        contour_bounds(self.glyphs.iter().flat_map(|g| g.points()))
    }

    pub fn width(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| max[0] - min[0])
    }

    pub fn height(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| max[1] - min[1])
    }

    /// Move the outline so its bounding box is centred on the origin.
    pub fn centered(mut self) -> Self {
        if let Some((min, max)) = self.bounds() {
            let dx = -(min[0] + max[0]) / 2.0;
            let dy = -(min[1] + max[1]) / 2.0;
            for glyph in &mut self.glyphs {
                glyph.translate(dx, dy);
            }
        }
        self
    }
}

fn contour_bounds<'a>(points: impl Iterator<Item = &'a [f64; 2]>) -> Option<([f64; 2], [f64; 2])> {
    let mut points = points.peekable();
    points.peek()?;
    let mut min = [f64::MAX, f64::MAX];
    let mut max = [f64::MIN, f64::MIN];
    for p in points {
        min[0] = min[0].min(p[0]);
        min[1] = min[1].min(p[1]);
        max[0] = max[0].max(p[0]);
        max[1] = max[1].max(p[1]);
    }
    Some((min, max))
}

/// Even-odd point-in-polygon test.
pub fn contains_point(contour: &[[f64; 2]], p: [f64; 2]) -> bool {
    let n = contour.len();
    let mut inside = false;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Shoelace area; positive for counter-clockwise contours.
pub fn signed_area(contour: &[[f64; 2]]) -> f64 {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let a = contour[i];
            let b = contour[(i + 1) % n];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f64>()
        / 2.0
}

/// Produces label outlines.
pub trait GlyphSource {
    /// Human-readable name, for logging and the summary.
    fn name(&self) -> &str;

    /// Outline `text` at font size `size` (mm), centred on the origin.
    fn outline(&self, text: &str, size: f64) -> TextOutline;
}

/// Pick the outline source for a configured label font, falling back to
/// the bundled face when the family cannot be loaded.
pub fn glyph_source(font: &LabelFont) -> GeometryResult<Box<dyn GlyphSource>> {
    let font = match font {
        LabelFont::Bundled => TrueTypeFont::bundled()?,
        LabelFont::System { family } => match TrueTypeFont::from_system(family) {
            Some(font) => {
                debug!("Using system font '{}' for labels", font.name());
                font
            }
            None => {
                warn!(
                    "Font family '{}' not available, falling back to {}",
                    family, BUNDLED_FAMILY
                );
                TrueTypeFont::bundled()?
            }
        },
    };
    Ok(Box::new(font))
}

// ---- TrueType -----------------------------------------------------------

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// A scalable font outlined through `rusttype`.
pub struct TrueTypeFont {
    family: String,
    font: Font<'static>,
}

impl TrueTypeFont {
    /// Look a family up in the system font database. Falls back to the
    /// system sans-serif face when the family itself is not installed.
    pub fn from_system(family: &str) -> Option<Self> {
        let families = [Family::Name(family), Family::SansSerif];
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let id = db().query(&query)?;
        let face = db().face(id)?;
        let bytes = match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                fs::read(path).ok()?
            }
            fontdb::Source::Binary(bytes) => bytes.as_ref().as_ref().to_vec(),
        };
        let resolved = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| family.to_string());

        Self::from_bytes(resolved, bytes, face.index)
    }

    /// The face shipped inside the binary.
    pub fn bundled() -> GeometryResult<Self> {
        Self::from_bytes(BUNDLED_FAMILY, BUNDLED_FONT.to_vec(), 0)
            .ok_or_else(|| GeometryError::Font(BUNDLED_FAMILY.to_string()))
    }

    pub fn from_bytes(family: impl Into<String>, bytes: Vec<u8>, index: u32) -> Option<Self> {
        let font = Font::try_from_vec_and_index(bytes, index)?;
        Some(Self {
            family: family.into(),
            font,
        })
    }
}

impl GlyphSource for TrueTypeFont {
    fn name(&self) -> &str {
        &self.family
    }

    fn outline(&self, text: &str, size: f64) -> TextOutline {
        let scale = Scale::uniform(size as f32);
        let v_metrics = self.font.v_metrics(scale);
        let start = rt_point(0.0, v_metrics.ascent);

        let glyphs = self
            .font
            .layout(text, scale, start)
            .filter_map(|glyph| {
                let mut builder = ContourBuilder::default();
                glyph
                    .build_outline(&mut builder)
                    .then(|| GlyphOutline::classify(builder.finish()))
            })
            .collect();

        TextOutline { glyphs }.centered()
    }
}

/// Flattens `rusttype` outlines into contours, flipping Y to point up.
#[derive(Default)]
struct ContourBuilder {
    contours: Vec<Contour>,
    current: Contour,
    last: [f64; 2],
}

impl ContourBuilder {
    fn push(&mut self, x: f64, y: f64) {
        self.last = [x, y];
        self.current.push([x, -y]);
    }

    fn flush(&mut self) {
        let mut contour = std::mem::take(&mut self.current);
        if contour.len() > 1 && contour.first() == contour.last() {
            contour.pop();
        }
        if contour.len() >= 3 {
            self.contours.push(contour);
        }
    }

    fn finish(mut self) -> Vec<Contour> {
        self.flush();
        self.contours
    }
}

impl OutlineBuilder for ContourBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x as f64, y as f64);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let [x0, y0] = self.last;
        let (x1, y1, x, y) = (x1 as f64, y1 as f64, x as f64, y as f64);
        for step in 1..=QUAD_STEPS {
            let t = step as f64 / QUAD_STEPS as f64;
            let mt = 1.0 - t;
            self.push(
                mt * mt * x0 + 2.0 * mt * t * x1 + t * t * x,
                mt * mt * y0 + 2.0 * mt * t * y1 + t * t * y,
            );
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let [x0, y0] = self.last;
        let (x1, y1, x2, y2, x, y) = (
            x1 as f64, y1 as f64, x2 as f64, y2 as f64, x as f64, y as f64,
        );
        for step in 1..=CUBIC_STEPS {
            let t = step as f64 / CUBIC_STEPS as f64;
            let mt = 1.0 - t;
            let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
            self.push(
                a * x0 + b * x1 + c * x2 + d * x,
                a * y0 + b * y1 + c * y2 + d * y,
            );
        }
    }

    fn close(&mut self) {
        self.flush();
    }
}
