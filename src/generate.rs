//! Build both parts and write the three STL files.

use anyhow::Context;
use buddycheck_designer::{
    glyph_source, BottomBuilder, Bounds, BuildContext, LidBuilder, Solid, SolidExporter,
    StlExporter,
};
use buddycheck_settings::Config;
use std::path::{Path, PathBuf};
use tracing::info;

/// What was written for one part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartReport {
    pub path: PathBuf,
    pub triangles: usize,
    /// Enclosed volume in mm³
    pub volume: f64,
    pub bounds: Option<Bounds>,
}

impl PartReport {
    fn new(solid: &Solid, path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            triangles: solid.triangles().len(),
            volume: solid.volume(),
            bounds: solid.bounds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub bottom: PartReport,
    pub lid: PartReport,
    pub lid_print: PartReport,
    /// Outline source actually used for the labels
    pub label_font: String,
}

/// Generate with the STL exporter from the config's output settings.
pub fn generate(config: &Config) -> anyhow::Result<GenerationReport> {
    generate_with(config, &StlExporter::new(config.output.format))
}

/// Build bottom, lid and print-orientation lid in order, exporting each as
/// soon as it is finished.
pub fn generate_with(
    config: &Config,
    exporter: &dyn SolidExporter,
) -> anyhow::Result<GenerationReport> {
    config.validate().context("Configuration rejected")?;

    let output = &config.output;
    std::fs::create_dir_all(&output.directory).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output.directory.display()
        )
    })?;

    let glyphs = glyph_source(&config.label_font).context("Failed to load label font")?;
    let ctx = BuildContext::new(&config.quality, glyphs.as_ref());

    info!("Building bottom enclosure (toggles on front face)");
    let bottom = BottomBuilder::new(&config.dimensions, &config.labels)
        .build(&ctx)
        .context("Failed to build bottom shell")?;
    let bottom_report = export(exporter, &bottom, &output.bottom_path())?;

    info!("Building lid");
    let lid_builder = LidBuilder::new(&config.dimensions);
    let lid = lid_builder.build(&ctx).context("Failed to build lid")?;
    let lid_report = export(exporter, &lid, &output.lid_path())?;

    let lid_print = lid_builder.print_orientation(&lid);
    let lid_print_report = export(exporter, &lid_print, &output.lid_print_path())?;

    Ok(GenerationReport {
        bottom: bottom_report,
        lid: lid_report,
        lid_print: lid_print_report,
        label_font: glyphs.name().to_string(),
    })
}

fn export(exporter: &dyn SolidExporter, solid: &Solid, path: &Path) -> anyhow::Result<PartReport> {
    exporter
        .export(solid, path)
        .with_context(|| format!("Failed to export {}", path.display()))?;
    Ok(PartReport::new(solid, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddycheck_core::{LabelFont, MeshQuality};
    use buddycheck_designer::{ExportError, ExportResult};
    use std::cell::RefCell;

    /// Records what it was asked to write without touching the disk.
    #[derive(Default)]
    struct Recorder {
        written: RefCell<Vec<(PathBuf, usize)>>,
    }

    impl SolidExporter for Recorder {
        fn export(&self, solid: &Solid, path: &Path) -> ExportResult<()> {
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), solid.triangles().len()));
            Ok(())
        }
    }

    struct Failing;

    impl SolidExporter for Failing {
        fn export(&self, _solid: &Solid, path: &Path) -> ExportResult<()> {
            Err(ExportError::EmptyMesh(path.to_path_buf()))
        }
    }

    fn draft_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.label_font = LabelFont::Bundled;
        config.quality = MeshQuality::draft();
        config.output.directory = dir.to_path_buf();
        config
    }

    #[test]
    fn test_exports_three_parts_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = draft_config(dir.path());
        let recorder = Recorder::default();

        let report = generate_with(&config, &recorder).unwrap();

        let written = recorder.written.borrow();
        let paths: Vec<&PathBuf> = written.iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            [
                &config.output.bottom_path(),
                &config.output.lid_path(),
                &config.output.lid_print_path()
            ]
        );
        assert_eq!(report.label_font, "Tuffy");
        assert_eq!(report.lid.triangles, report.lid_print.triangles);
        assert!((report.lid.volume - report.lid_print.volume).abs() < 1e-6);
        assert!(report.bottom.volume > 0.0);
    }

    #[test]
    fn test_export_failure_names_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = draft_config(dir.path());

        let err = generate_with(&config, &Failing).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("buddy_check_bottom.stl"), "{message}");
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = draft_config(dir.path());
        config.dimensions.shell.wall_thickness = -1.0;
        let recorder = Recorder::default();

        assert!(generate_with(&config, &recorder).is_err());
        assert!(recorder.written.borrow().is_empty());
    }
}
