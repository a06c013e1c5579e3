//! Lid: a filleted plate with a lip that drops into the bottom's ledge
//! channel, light-pass holes over the toggles and counterbored screw holes
//! over the corner posts.

use buddycheck_core::{DimensionSet, CUT_MARGIN};
use tracing::info;

use crate::error::GeometryResult;
use crate::placement::{Placement, WorkPlane};
use crate::profile::Profile;
use crate::recipe::{BuildContext, Feature, Recipe};
use crate::solid::Solid;

pub struct LidBuilder<'a> {
    dims: &'a DimensionSet,
}

impl<'a> LidBuilder<'a> {
    pub fn new(dims: &'a DimensionSet) -> Self {
        Self { dims }
    }

    pub fn build(&self, ctx: &BuildContext<'_>) -> GeometryResult<Solid> {
        self.dims.validate()?;
        self.recipe().build(ctx)
    }

    pub fn recipe(&self) -> Recipe {
        let d = self.dims;
        let s = &d.shell;
        let l = &d.lid;
        let (cx, cy) = (s.length / 2.0, s.width / 2.0);
        // Holes run from below the lip to above the plate.
        let through_start = -l.inset_depth - CUT_MARGIN;
        let through_depth = l.thickness + l.inset_depth + 2.0 * CUT_MARGIN;

        let mut recipe = Recipe::new(
            "lid",
            Feature::new(
                "plate",
                Profile::rounded_rect(s.length, s.width, s.fillet_radius),
                Placement::xy(cx, cy, 0.0),
                l.thickness,
            ),
        );

        let lip = d.lip_footprint();
        recipe.add(Feature::new(
            "lip",
            Profile::rounded_rect(lip.length(), lip.width(), d.lip_fillet_radius()),
            Placement::xy(cx, cy, -l.inset_depth),
            l.inset_depth + CUT_MARGIN,
        ));

        for (i, led) in d.led_positions().into_iter().enumerate() {
            recipe.cut(Feature::new(
                format!("light hole {}", i + 1),
                Profile::circle(d.toggles.led_diameter),
                Placement::xy(led.x, led.y, through_start),
                through_depth,
            ));
        }

        for (i, corner) in d.corner_positions().into_iter().enumerate() {
            recipe.cut(Feature::new(
                format!("screw hole {}", i + 1),
                Profile::circle(l.screw_clearance_diameter),
                Placement::xy(corner.x, corner.y, through_start),
                through_depth,
            ));
            recipe.cut(Feature::new(
                format!("counterbore {}", i + 1),
                Profile::circle(l.counterbore_diameter),
                Placement::xy(corner.x, corner.y, l.thickness - l.counterbore_depth),
                l.counterbore_depth + CUT_MARGIN,
            ));
        }

        recipe
    }

    /// The lid turned top-face-down for printing: mirrored through the
    /// plate's mid-plane so the plate keeps its Z range.
    pub fn print_orientation(&self, lid: &Solid) -> Solid {
        info!("Mirroring lid for print orientation");
        lid.mirror(WorkPlane::XY, self.dims.lid.thickness / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lid_recipe_features() {
        let dims = DimensionSet::default();
        let recipe = LidBuilder::new(&dims).recipe();

        assert_eq!(recipe.additions().count(), 1);
        // 8 light holes + 4 screw holes + 4 counterbores
        assert_eq!(recipe.cuts().count(), 16);

        let hole = recipe.feature("light hole 8").unwrap();
        assert_eq!(hole.placement.u, dims.toggle_x(7));
        assert_eq!(hole.placement.v, dims.toggles.led_y);
    }

    #[test]
    fn test_counterbore_opens_through_top() {
        let dims = DimensionSet::default();
        let recipe = LidBuilder::new(&dims).recipe();
        let cb = recipe.feature("counterbore 1").unwrap();

        assert!((cb.placement.w - 1.5).abs() < 1e-12);
        assert!(cb.placement.w + cb.depth > dims.lid.thickness);
        assert_eq!(cb.profile, Profile::circle(6.0));
    }

    #[test]
    fn test_lip_inset_from_plate() {
        let dims = DimensionSet::default();
        let recipe = LidBuilder::new(&dims).recipe();
        match &recipe.feature("lip").unwrap().profile {
            Profile::RoundedRect {
                width,
                height,
                radius,
            } => {
                assert!((width - (171.45 - 5.6)).abs() < 1e-9);
                assert!((height - (76.2 - 5.6)).abs() < 1e-9);
                assert_eq!(*radius, 0.5);
            }
            other => panic!("unexpected lip profile {other}"),
        }
    }
}
