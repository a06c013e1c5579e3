//! Ordered construction steps.
//!
//! A [`Recipe`] is a base feature and a list of boolean steps. Building folds
//! the steps over the base solid in order; each step yields a new solid.

use buddycheck_core::MeshQuality;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::error::{GeometryError, GeometryResult};
use crate::glyphs::GlyphSource;
use crate::placement::Placement;
use crate::profile::Profile;
use crate::solid::Solid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Difference,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Difference => write!(f, "difference"),
        }
    }
}

/// A profile, where it sits, and how far it is extruded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub profile: Profile,
    pub placement: Placement,
    pub depth: f64,
}

impl Feature {
    pub fn new(name: impl Into<String>, profile: Profile, placement: Placement, depth: f64) -> Self {
        Self {
            name: name.into(),
            profile,
            placement,
            depth,
        }
    }

    /// The extruded tools for this feature; text yields one per glyph region.
    pub fn to_solids(&self, ctx: &BuildContext<'_>) -> GeometryResult<Vec<Solid>> {
        let sketches = self.profile.to_sketches(&self.name, ctx.quality, ctx.glyphs)?;
        Ok(sketches
            .iter()
            .map(|sketch| Solid::extrude(sketch, self.depth, &self.placement))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub op: BooleanOp,
    pub feature: Feature,
}

/// Tessellation and lettering shared by every feature of a build.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub quality: &'a MeshQuality,
    pub glyphs: &'a dyn GlyphSource,
}

impl<'a> BuildContext<'a> {
    pub fn new(quality: &'a MeshQuality, glyphs: &'a dyn GlyphSource) -> Self {
        Self { quality, glyphs }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub base: Feature,
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, base: Feature) -> Self {
        Self {
            name: name.into(),
            base,
            steps: Vec::new(),
        }
    }

    pub fn add(&mut self, feature: Feature) -> &mut Self {
        self.push(BooleanOp::Union, feature)
    }

    pub fn cut(&mut self, feature: Feature) -> &mut Self {
        self.push(BooleanOp::Difference, feature)
    }

    fn push(&mut self, op: BooleanOp, feature: Feature) -> &mut Self {
        self.steps.push(Step { op, feature });
        self
    }

    /// Features removed from the base, in order.
    pub fn cuts(&self) -> impl Iterator<Item = &Feature> {
        self.steps
            .iter()
            .filter(|s| s.op == BooleanOp::Difference)
            .map(|s| &s.feature)
    }

    /// Features added to the base, in order.
    pub fn additions(&self) -> impl Iterator<Item = &Feature> {
        self.steps
            .iter()
            .filter(|s| s.op == BooleanOp::Union)
            .map(|s| &s.feature)
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        std::iter::once(&self.base)
            .chain(self.steps.iter().map(|s| &s.feature))
            .find(|f| f.name == name)
    }

    /// Fold every step over the base solid and check the result.
    pub fn build(&self, ctx: &BuildContext<'_>) -> GeometryResult<Solid> {
        info!(
            "Building {} ({} steps, {} glyphs)",
            self.name,
            self.steps.len(),
            ctx.glyphs.name()
        );

        let mut pieces = self.base.to_solids(ctx)?.into_iter();
        let first = pieces
            .next()
            .ok_or_else(|| GeometryError::Empty(self.base.name.clone()))?;
        let base = pieces.fold(first, |solid, piece| solid.union(&piece));

        let solid = self.steps.iter().try_fold(base, |solid, step| {
            let tools = step.feature.to_solids(ctx)?;
            debug!(
                op = %step.op,
                feature = %step.feature.name,
                profile = %step.feature.profile,
                tools = tools.len(),
                "Applying step"
            );
            Ok::<_, GeometryError>(tools.iter().fold(solid, |solid, tool| match step.op {
                BooleanOp::Union => solid.union(tool),
                BooleanOp::Difference => solid.difference(tool),
            }))
        })?;

        let solid = solid.ensure_valid(&self.name)?;
        debug!(
            polygons = solid.polygon_count(),
            "Finished {}", self.name
        );
        Ok(solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::TrueTypeFont;

    fn plate() -> Recipe {
        let mut recipe = Recipe::new(
            "plate",
            Feature::new("slab", Profile::rect(20.0, 10.0), Placement::xy(10.0, 5.0, 0.0), 2.0),
        );
        recipe
            .cut(Feature::new(
                "hole",
                Profile::rect(2.0, 2.0),
                Placement::xy(5.0, 5.0, -0.1),
                2.2,
            ))
            .add(Feature::new(
                "boss",
                Profile::rect(4.0, 4.0),
                Placement::xy(15.0, 5.0, 1.9),
                1.1,
            ));
        recipe
    }

    #[test]
    fn test_steps_keep_order() {
        let recipe = plate();
        assert_eq!(recipe.steps.len(), 2);
        assert_eq!(recipe.steps[0].op, BooleanOp::Difference);
        assert_eq!(recipe.cuts().map(|f| f.name.as_str()).collect::<Vec<_>>(), ["hole"]);
        assert_eq!(recipe.additions().count(), 1);
        assert!(recipe.feature("slab").is_some());
        assert!(recipe.feature("missing").is_none());
    }

    #[test]
    fn test_build_folds_steps() {
        let quality = MeshQuality::draft();
        let font = TrueTypeFont::bundled().unwrap();
        let ctx = BuildContext::new(&quality, &font);
        let solid = plate().build(&ctx).unwrap();

        // 400 slab - 8 hole + 16 boss above the slab top.
        assert!((solid.volume() - (400.0 - 8.0 + 16.0)).abs() < 1e-6);
        let bounds = solid.bounds().unwrap();
        assert!((bounds.max.z - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_step_applies_every_glyph() {
        let quality = MeshQuality::draft();
        let font = TrueTypeFont::bundled().unwrap();
        let ctx = BuildContext::new(&quality, &font);
        let removed = |text: &str| {
            let mut recipe = plate();
            recipe.steps.clear();
            recipe.cut(Feature::new(
                "label",
                Profile::text(text, 4.0),
                Placement::xy(10.0, 5.0, -0.1),
                2.2,
            ));
            400.0 - recipe.build(&ctx).unwrap().volume()
        };

        let one = removed("I");
        assert!(one > 0.1, "removed {one}");
        assert!((removed("III") - 3.0 * one).abs() < 1e-6 * one.max(1.0) + 1e-6);
    }

    #[test]
    fn test_invalid_feature_aborts_build() {
        let quality = MeshQuality::draft();
        let font = TrueTypeFont::bundled().unwrap();
        let ctx = BuildContext::new(&quality, &font);
        let mut recipe = plate();
        recipe.cut(Feature::new("bad", Profile::circle(-1.0), Placement::xy(0.0, 0.0, 0.0), 1.0));
        assert!(recipe.build(&ctx).is_err());
    }
}
