//! Console summary printed after a successful run.

use buddycheck_core::{format_length, get_unit_label, MeasurementSystem};
use buddycheck_settings::Config;
use std::fmt;

use crate::generate::GenerationReport;
use crate::{BUILD_DATE, VERSION};

const RULE_WIDTH: usize = 60;

/// Render the run summary as it is shown on stdout.
pub fn render_summary(config: &Config, report: &GenerationReport) -> String {
    Summary { config, report }.to_string()
}

struct Summary<'a> {
    config: &'a Config,
    report: &'a GenerationReport,
}

impl Summary<'_> {
    fn triple(&self, system: MeasurementSystem, precision: usize) -> String {
        let s = &self.config.dimensions.shell;
        let unit = get_unit_label(system);
        format!(
            "{} x {} x {} {}",
            format_length(s.length, system, precision),
            format_length(s.width, system, precision),
            format_length(s.height, system, precision),
            unit
        )
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.config.dimensions;
        let t = &d.toggles;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "BUDDYCHECK BOX v{VERSION} ({BUILD_DATE}) - STL generation complete")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "  Box: {}", self.triple(MeasurementSystem::Metric, 1))?;
        writeln!(f, "       ({})", self.triple(MeasurementSystem::Imperial, 2))?;
        writeln!(f)?;
        writeln!(
            f,
            "  FRONT FACE: {} toggle switch holes ({}mm)",
            t.count, t.diameter
        )?;
        writeln!(f, "    {} cut-through labels:", t.count)?;
        for (i, label) in self.config.labels.resolve(t.count).iter().enumerate() {
            writeln!(f, "      Toggle {}: {}", i + 1, label)?;
        }
        writeln!(f, "  TOP LID: {} LED holes ({}mm) near front edge", t.count, t.led_diameter)?;
        writeln!(
            f,
            "  BACK: input connector ({}x{}mm)",
            d.rear_connector.width, d.rear_connector.height
        )?;
        writeln!(
            f,
            "  RIGHT: {}x output connector ({}x{}mm)",
            d.side_connectors.count, d.side_connectors.width, d.side_connectors.height
        )?;
        writeln!(f, "  BOTTOM: {} vent slots", d.vents.count)?;
        writeln!(f, "  CORNERS: 4x M3 screw posts")?;
        writeln!(f)?;
        writeln!(f, "  Label lettering: {}", self.report.label_font)?;
        writeln!(f, "  Output dir: {}", self.config.output.directory.display())?;
        for part in [&self.report.bottom, &self.report.lid, &self.report.lid_print] {
            writeln!(
                f,
                "    Saved: {} ({} triangles)",
                part.path.display(),
                part.triangles
            )?;
        }
        writeln!(f)?;
        writeln!(f, "  TIP: Print the lid in a light color (white/natural)")?;
        write!(f, "  and use colored LEDs for best glow-through effect!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::PartReport;
    use buddycheck_core::LabelSequence;
    use std::path::PathBuf;

    fn part(name: &str) -> PartReport {
        PartReport {
            path: PathBuf::from("out").join(name),
            triangles: 12,
            volume: 1.0,
            bounds: None,
        }
    }

    fn report() -> GenerationReport {
        GenerationReport {
            bottom: part("buddy_check_bottom.stl"),
            lid: part("buddy_check_lid.stl"),
            lid_print: part("buddy_check_lid_print_orientation.stl"),
            label_font: "Tuffy".to_string(),
        }
    }

    #[test]
    fn test_summary_dimensions_in_both_units() {
        let text = render_summary(&Config::default(), &report());
        assert!(text.contains("x 76.2 x 38.1 mm"));
        assert!(text.contains("(6.75 x 3.00 x 1.50 in)"));
        assert!(text.contains(VERSION));
    }

    #[test]
    fn test_summary_lists_every_toggle() {
        let mut config = Config::default();
        config.labels = LabelSequence::new(["POWER"]);
        let text = render_summary(&config, &report());
        assert!(text.contains("Toggle 1: POWER"));
        assert!(text.contains("Toggle 2: ITEM 2"));
        assert!(text.contains("Toggle 8: ITEM 8"));
        assert!(!text.contains("Toggle 9"));
    }

    #[test]
    fn test_summary_names_outputs() {
        let text = render_summary(&Config::default(), &report());
        assert!(text.contains("buddy_check_lid_print_orientation.stl"));
        assert!(text.contains("4x M3 screw posts"));
        assert!(text.contains("5 vent slots"));
        assert!(text.contains("glow-through"));
    }
}
