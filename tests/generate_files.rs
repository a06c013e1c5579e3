use buddycheck::{generate, render_summary};
use buddycheck_core::{LabelFont, LabelSequence, MeshQuality, StlFormat};
use buddycheck_settings::Config;
use std::fs::File;
use std::path::Path;

fn draft_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.label_font = LabelFont::Bundled;
    config.quality = MeshQuality::draft();
    config.labels = LabelSequence::new(["ON", "OFF"]);
    config.output.directory = dir.join("stl");
    config
}

#[test]
fn test_generate_writes_all_parts() {
    let dir = tempfile::tempdir().unwrap();
    let config = draft_config(dir.path());

    let report = generate(&config).unwrap();

    for part in [&report.bottom, &report.lid, &report.lid_print] {
        assert!(part.path.starts_with(dir.path().join("stl")));
        let mut file = File::open(&part.path).unwrap();
        let mesh = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(mesh.faces.len(), part.triangles);
    }
    assert!(report
        .bottom
        .path
        .ends_with("buddy_check_bottom.stl"));
    assert!(report
        .lid_print
        .path
        .ends_with("buddy_check_lid_print_orientation.stl"));
}

#[test]
fn test_generate_ascii_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = draft_config(dir.path());
    config.output.format = StlFormat::Ascii;
    config.output.file_stem = "desk_box".to_string();

    let report = generate(&config).unwrap();
    let text = std::fs::read_to_string(&report.lid.path).unwrap();
    assert!(text.starts_with("solid desk_box_lid"));
    assert!(text.trim_end().ends_with("endsolid desk_box_lid"));

    let summary = render_summary(&config, &report);
    assert!(summary.contains("Toggle 1: ON"));
    assert!(summary.contains("Toggle 3: ITEM 3"));
    assert!(summary.contains("desk_box_bottom.stl"));
}

#[test]
fn test_generate_rejects_bad_config_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = draft_config(dir.path());
    config.output.file_stem = String::new();

    assert!(generate(&config).is_err());
    assert!(!dir.path().join("stl").exists());
}
