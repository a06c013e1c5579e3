//! 2D profiles, centred on the sketch origin.

use buddycheck_core::MeshQuality;
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use crate::error::{GeometryError, GeometryResult};
use crate::glyphs::{Contour, GlyphOutline, GlyphSource, TextOutline, BRIDGE_WIDTH};

/// Shape sketched on a work plane before extrusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Profile {
    Circle { diameter: f64 },
    Rect { width: f64, height: f64 },
    /// Rectangle with all four corners rounded
    RoundedRect { width: f64, height: f64, radius: f64 },
    /// Label outline at the given font size
    Text { text: String, size: f64 },
}

impl Profile {
    pub fn circle(diameter: f64) -> Self {
        Self::Circle { diameter }
    }

    pub fn rect(width: f64, height: f64) -> Self {
        Self::Rect { width, height }
    }

    pub fn rounded_rect(width: f64, height: f64, radius: f64) -> Self {
        Self::RoundedRect {
            width,
            height,
            radius,
        }
    }

    pub fn text(text: impl Into<String>, size: f64) -> Self {
        Self::Text {
            text: text.into(),
            size,
        }
    }

    /// Outline as polygon contours (holes only arise for text).
    pub fn outline(
        &self,
        quality: &MeshQuality,
        glyphs: &dyn GlyphSource,
    ) -> GeometryResult<TextOutline> {
        let contour = match self {
            Self::Circle { diameter } => circle_points(diameter / 2.0, quality.circle_segments),
            Self::Rect { width, height } => rect_points(*width, *height),
            Self::RoundedRect {
                width,
                height,
                radius,
            } => rounded_rect_points(*width, *height, *radius, quality.fillet_segments),
            Self::Text { text, size } => {
                let outline = glyphs.outline(text, *size);
                if outline.is_empty() {
                    return Err(GeometryError::NoGlyphs(text.clone()));
                }
                return Ok(outline);
            }
        };
        Ok(TextOutline {
            glyphs: vec![GlyphOutline {
                outers: vec![contour],
                holes: Vec::new(),
            }],
        })
    }

    /// Build the 2D sketches for this profile: one for a plain shape, one
    /// per filled glyph region for text. Text counters are held in place by
    /// stencil bridges.
    ///
    /// Disjoint glyph regions are never unioned in 2D; each one is extruded
    /// and applied as its own tool.
    pub fn to_sketches(
        &self,
        name: &str,
        quality: &MeshQuality,
        glyphs: &dyn GlyphSource,
    ) -> GeometryResult<Vec<Sketch<()>>> {
        self.check(name)?;
        let outline = self.outline(quality, glyphs)?;
        let bridge = match self {
            Self::Text { size, .. } => size * BRIDGE_WIDTH,
            _ => 0.0,
        };

        let sketches = outline
            .glyphs
            .iter()
            .flat_map(GlyphOutline::pieces)
            .map(|piece| {
                let mut body = Sketch::polygon(&piece.outers[0], None);
                for cut in piece.holes.iter().chain(&piece.bridges(bridge)) {
                    body = body.difference(&Sketch::polygon(cut, None));
                }
                body
            })
            .collect();
        Ok(sketches)
    }

    fn check(&self, name: &str) -> GeometryResult<()> {
        let invalid = |reason: &str| GeometryError::InvalidProfile {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let positive = |v: f64| v > 0.0 && v.is_finite();
        match self {
            Self::Circle { diameter } if !positive(*diameter) => {
                Err(invalid("diameter must be positive"))
            }
            Self::Rect { width, height } if !positive(*width) || !positive(*height) => {
                Err(invalid("width and height must be positive"))
            }
            Self::RoundedRect {
                width,
                height,
                radius,
            } => {
                if !positive(*width) || !positive(*height) {
                    Err(invalid("width and height must be positive"))
                } else if *radius < 0.0 || 2.0 * radius > width.min(*height) {
                    Err(invalid("corner radius does not fit"))
                } else {
                    Ok(())
                }
            }
            Self::Text { size, .. } if !positive(*size) => {
                Err(invalid("font size must be positive"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circle { diameter } => write!(f, "circle d{diameter}"),
            Self::Rect { width, height } => write!(f, "rect {width}x{height}"),
            Self::RoundedRect {
                width,
                height,
                radius,
            } => write!(f, "rect {width}x{height} r{radius}"),
            Self::Text { text, size } => write!(f, "text \"{text}\" @{size}"),
        }
    }
}

fn circle_points(radius: f64, segments: usize) -> Contour {
    (0..segments)
        .map(|i| {
            let theta = TAU * i as f64 / segments as f64;
            [radius * theta.cos(), radius * theta.sin()]
        })
        .collect()
}

fn rect_points(width: f64, height: f64) -> Contour {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![[-hw, -hh], [hw, -hh], [hw, hh], [-hw, hh]]
}

/// Counter-clockwise outline with `segments` facets per quarter-round corner.
fn rounded_rect_points(width: f64, height: f64, radius: f64, segments: usize) -> Contour {
    if radius <= 0.0 {
        return rect_points(width, height);
    }
    let (hw, hh) = (width / 2.0, height / 2.0);
    let corners = [
        (hw - radius, -hh + radius, -FRAC_PI_2),
        (hw - radius, hh - radius, 0.0),
        (-hw + radius, hh - radius, FRAC_PI_2),
        (-hw + radius, -hh + radius, 2.0 * FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(4 * (segments + 1));
    for (cx, cy, start) in corners {
        for i in 0..=segments {
            let theta = start + FRAC_PI_2 * i as f64 / segments as f64;
            points.push([cx + radius * theta.cos(), cy + radius * theta.sin()]);
        }
    }
    points.dedup_by(|a, b| (a[0] - b[0]).abs() < 1e-12 && (a[1] - b[1]).abs() < 1e-12);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::{signed_area, TrueTypeFont};

    #[test]
    fn test_circle_points_on_radius() {
        let points = circle_points(1.5, 16);
        assert_eq!(points.len(), 16);
        for p in points {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rounded_rect_extent_and_winding() {
        let points = rounded_rect_points(10.0, 6.0, 2.0, 4);
        assert_eq!(points.len(), 20);
        assert!(signed_area(&points) > 0.0);

        let max_x = points.iter().map(|p| p[0]).fold(f64::MIN, f64::max);
        let max_y = points.iter().map(|p| p[1]).fold(f64::MIN, f64::max);
        assert!((max_x - 5.0).abs() < 1e-12);
        assert!((max_y - 3.0).abs() < 1e-12);

        // Area of a rounded rectangle approaches w*h - (4 - pi) r^2.
        let exact = 60.0 - (4.0 - std::f64::consts::PI) * 4.0;
        assert!((signed_area(&points) - exact).abs() < 0.5);
    }

    #[test]
    fn test_invalid_profiles_rejected() {
        let quality = MeshQuality::draft();
        let font = TrueTypeFont::bundled().unwrap();
        let err = Profile::circle(0.0)
            .to_sketches("toggle 1", &quality, &font)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid profile for 'toggle 1': diameter must be positive"
        );

        assert!(Profile::rounded_rect(4.0, 4.0, 3.0)
            .to_sketches("plate", &quality, &font)
            .is_err());
    }

    #[test]
    fn test_blank_text_has_no_glyphs() {
        let font = TrueTypeFont::bundled().unwrap();
        let err = Profile::text("  ", 3.0)
            .outline(&MeshQuality::draft(), &font)
            .unwrap_err();
        assert!(matches!(err, GeometryError::NoGlyphs(_)));
    }

    #[test]
    fn test_plain_profiles_are_one_sketch() {
        let font = TrueTypeFont::bundled().unwrap();
        let sketches = Profile::rounded_rect(10.0, 6.0, 2.0)
            .to_sketches("plate", &MeshQuality::draft(), &font)
            .unwrap();
        assert_eq!(sketches.len(), 1);
    }

    #[test]
    fn test_text_gives_one_sketch_per_glyph_region() {
        let font = TrueTypeFont::bundled().unwrap();
        let quality = MeshQuality::draft();
        let profile = Profile::text("COFFEE", 3.0);
        let outline = profile.outline(&quality, &font).unwrap();
        let regions: usize = outline.glyphs.iter().map(|g| g.outers.len()).sum();

        let sketches = profile.to_sketches("label 1", &quality, &font).unwrap();
        assert_eq!(sketches.len(), regions);
        assert!(sketches.len() >= 6);
    }

    #[test]
    fn test_text_outline_uses_glyph_source() {
        let font = TrueTypeFont::bundled().unwrap();
        let outline = Profile::text("OK", 3.0)
            .outline(&MeshQuality::draft(), &font)
            .unwrap();
        assert_eq!(outline.glyphs.len(), 2);
    }
}
