//! Bottom shell.
//!
//! A filleted box hollowed down to the floor, with the toggle row and its
//! labels through the front wall, the input connector through the rear wall,
//! output connectors through the right-hand wall, vent slots through the
//! floor, four bored corner posts and the ledge band the lid seats in.
//!
//! Step order matters: posts and the ledge are added after the wall cuts so
//! no cut can bite into them, and the post bores are cut last.

use buddycheck_core::{DimensionSet, LabelSequence, CUT_MARGIN};
use tracing::{debug, warn};

use crate::error::GeometryResult;
use crate::placement::Placement;
use crate::profile::Profile;
use crate::recipe::{BuildContext, Feature, Recipe};
use crate::solid::Solid;

pub struct BottomBuilder<'a> {
    dims: &'a DimensionSet,
    labels: &'a LabelSequence,
}

impl<'a> BottomBuilder<'a> {
    pub fn new(dims: &'a DimensionSet, labels: &'a LabelSequence) -> Self {
        Self { dims, labels }
    }

    /// Validate the dimension set, then build the shell.
    pub fn build(&self, ctx: &BuildContext<'_>) -> GeometryResult<Solid> {
        self.dims.validate()?;
        self.check_labels(ctx);
        self.recipe().build(ctx)
    }

    pub fn recipe(&self) -> Recipe {
        let d = self.dims;
        let s = &d.shell;
        let height = d.bottom_height();
        let (cx, cy) = (s.length / 2.0, s.width / 2.0);
        let wall_cut = s.wall_thickness + 2.0 * CUT_MARGIN;

        let mut recipe = Recipe::new(
            "bottom",
            Feature::new(
                "outer shell",
                Profile::rounded_rect(s.length, s.width, s.fillet_radius),
                Placement::xy(cx, cy, 0.0),
                height,
            ),
        );

        let cavity = d.cavity_footprint();
        recipe.cut(Feature::new(
            "cavity",
            Profile::rounded_rect(cavity.length(), cavity.width(), d.inner_fillet_radius()),
            Placement::xy(cx, cy, s.floor_thickness),
            height,
        ));

        let t = &d.toggles;
        for (i, x) in d.toggle_positions().into_iter().enumerate() {
            recipe.cut(Feature::new(
                format!("toggle {}", i + 1),
                Profile::circle(t.diameter),
                Placement::xz(x, t.z, -CUT_MARGIN),
                wall_cut,
            ));

            let label = self.labels.label_for(i);
            if label.trim().is_empty() {
                debug!("Toggle {} has a blank label, no cutout", i + 1);
                continue;
            }
            recipe.cut(Feature::new(
                format!("label {}", i + 1),
                Profile::text(label.into_owned(), t.text_size),
                Placement::xz(x, d.label_z(), -CUT_MARGIN),
                wall_cut,
            ));
        }

        let rear = &d.rear_connector;
        recipe.cut(Feature::new(
            "rear connector",
            Profile::rect(rear.width, rear.height),
            Placement::xz(rear.x, rear.z, s.width - s.wall_thickness - CUT_MARGIN),
            wall_cut,
        ));

        let side = &d.side_connectors;
        for (i, y) in d.side_connector_positions().into_iter().enumerate() {
            recipe.cut(Feature::new(
                format!("side connector {}", i + 1),
                Profile::rect(side.width, side.height),
                Placement::yz(y, side.z, s.length - s.wall_thickness - CUT_MARGIN),
                wall_cut,
            ));
        }

        let vents = &d.vents;
        for (i, x) in d.vent_positions().into_iter().enumerate() {
            recipe.cut(Feature::new(
                format!("vent {}", i + 1),
                Profile::rect(vents.width, vents.length),
                Placement::xy(x, cy, -CUT_MARGIN),
                s.floor_thickness + 2.0 * CUT_MARGIN,
            ));
        }

        // Posts start just inside the floor so the union overlaps it.
        let p = &d.posts;
        let corners = d.corner_positions();
        for (i, corner) in corners.iter().enumerate() {
            recipe.add(Feature::new(
                format!("post {}", i + 1),
                Profile::circle(p.outer_diameter),
                Placement::xy(corner.x, corner.y, s.floor_thickness - CUT_MARGIN),
                d.post_height() + CUT_MARGIN,
            ));
        }

        // The channel is cut back to the wall line, so this pair only squares
        // off the filleted inner corners at the top of the shell.
        let ledge = d.ledge_footprint();
        recipe.add(Feature::new(
            "ledge",
            Profile::rect(ledge.length(), ledge.width()),
            Placement::xy(cx, cy, d.ledge_z()),
            d.lid.thickness,
        ));
        let channel = d.ledge_channel_footprint();
        recipe.cut(Feature::new(
            "ledge channel",
            Profile::rect(channel.length(), channel.width()),
            Placement::xy(cx, cy, d.ledge_z() - CUT_MARGIN),
            d.lid.thickness + 2.0 * CUT_MARGIN,
        ));

        // Bores go in last and start below the post base, on a plane no
        // other face lies on.
        let bore_start = s.floor_thickness - 2.0 * CUT_MARGIN;
        for (i, corner) in corners.iter().enumerate() {
            recipe.cut(Feature::new(
                format!("post bore {}", i + 1),
                Profile::circle(p.inner_diameter),
                Placement::xy(corner.x, corner.y, bore_start),
                d.post_top_z() - bore_start + 2.0 * CUT_MARGIN,
            ));
        }

        recipe
    }

    /// Labels wider than the toggle pitch run into their neighbours. The cut
    /// is still made; this only warns. Counters are reported because the
    /// stencil bridges holding them show in the finished label.
    fn check_labels(&self, ctx: &BuildContext<'_>) {
        let pitch = self.dims.toggle_spacing();
        for i in 0..self.dims.toggles.count {
            let label = self.labels.label_for(i);
            let outline = ctx.glyphs.outline(&label, self.dims.toggles.text_size);
            let counters = outline.counter_count();
            if counters > 0 {
                debug!(
                    "Label '{}' has {} counter(s), each held by a stencil bridge",
                    label, counters
                );
            }
            let width = outline.width();
            if pitch > 0.0 && width > pitch {
                warn!(
                    "Label '{}' is {:.1}mm wide, wider than the {:.1}mm toggle pitch",
                    label, width, pitch
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::WorkPlane;
    use crate::recipe::BooleanOp;

    #[test]
    fn test_recipe_step_order() {
        let dims = DimensionSet::default();
        let labels = LabelSequence::default();
        let recipe = BottomBuilder::new(&dims, &labels).recipe();

        let names: Vec<&str> = recipe.steps.iter().map(|s| s.feature.name.as_str()).collect();
        assert_eq!(names[0], "cavity");
        assert_eq!(names[1], "toggle 1");
        assert_eq!(names[2], "label 1");
        assert_eq!(names.last(), Some(&"post bore 4"));

        let first_post = names.iter().position(|n| *n == "post 1").unwrap();
        let last_wall_cut = names.iter().rposition(|n| n.starts_with("vent")).unwrap();
        assert!(first_post > last_wall_cut);

        let channel = names.iter().position(|n| *n == "ledge channel").unwrap();
        let first_bore = names.iter().position(|n| *n == "post bore 1").unwrap();
        assert!(first_bore > channel);

        // cavity + 8 toggles + 8 labels + rear + 2 side + 5 vents + 4 bores + channel
        assert_eq!(recipe.cuts().count(), 1 + 8 + 8 + 1 + 2 + 5 + 4 + 1);
        // 4 posts + ledge
        assert_eq!(recipe.additions().count(), 5);
    }

    #[test]
    fn test_labels_follow_sequence_with_fallback() {
        let dims = DimensionSet::default();
        let labels = LabelSequence::new(["POWER"]);
        let recipe = BottomBuilder::new(&dims, &labels).recipe();

        let text = |name: &str| match &recipe.feature(name).unwrap().profile {
            Profile::Text { text, .. } => text.clone(),
            other => panic!("unexpected profile {other}"),
        };
        assert_eq!(text("label 1"), "POWER");
        assert_eq!(text("label 2"), "ITEM 2");
        assert_eq!(text("label 8"), "ITEM 8");
    }

    #[test]
    fn test_blank_label_skipped() {
        let dims = DimensionSet::default();
        let labels = LabelSequence::new(["", "TASKS"]);
        let recipe = BottomBuilder::new(&dims, &labels).recipe();
        assert!(recipe.feature("label 1").is_none());
        assert!(recipe.feature("label 2").is_some());
        assert!(recipe.feature("toggle 1").is_some());
    }

    #[test]
    fn test_wall_cuts_span_the_wall() {
        let dims = DimensionSet::default();
        let labels = LabelSequence::default();
        let recipe = BottomBuilder::new(&dims, &labels).recipe();

        let toggle = recipe.feature("toggle 1").unwrap();
        assert_eq!(toggle.placement.plane, WorkPlane::XZ);
        assert_eq!(toggle.placement.w, -CUT_MARGIN);
        assert!(toggle.placement.w + toggle.depth > dims.shell.wall_thickness);

        let side = recipe.feature("side connector 2").unwrap();
        assert_eq!(side.placement.plane, WorkPlane::YZ);
        assert!(side.placement.w < dims.shell.length - dims.shell.wall_thickness);
        assert!(side.placement.w + side.depth > dims.shell.length);

        // The bore overruns the post at both ends without sharing its base.
        let bore = recipe.feature("post bore 1").unwrap();
        let post = recipe.feature("post 1").unwrap();
        assert!(bore.placement.w + bore.depth > post.placement.w + post.depth);
        assert!(bore.placement.w < post.placement.w);
        assert!(bore.placement.w > 0.0);
        assert!(recipe
            .steps
            .iter()
            .any(|s| s.op == BooleanOp::Union && s.feature.name == "ledge"));
    }
}
