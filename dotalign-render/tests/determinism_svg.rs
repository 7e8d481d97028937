use dotalign_core::{build, enumerate_optimal_paths, DotPlot, ScoringScheme};
use dotalign_render::vector_export::{ExportConfig, VectorExporter};

fn deterministic_config() -> ExportConfig {
    ExportConfig {
        cell_size: 32.0,
        font_size: 11,
        font_family: "Arial, sans-serif".into(),
        show_legend: true,
        show_footer: false, // disable dynamic timestamp
        show_values: true,
        title: Some("Determinism Test".into()),
        background_color: "#ffffff".into(),
        match_color: "#ff0000".into(),
        main_diagonal_color: "#000000".into(),
        reverse_diagonal_color: "#008000".into(),
        provenance_comment: Some("determinism".into()),
    }
}

#[test]
fn scoring_svg_export_is_deterministic() {
    let _ = env_logger::builder().is_test(true).try_init();

    let scheme = ScoringScheme::new(5.0, -2.0, -4.0);
    let (a, b) = (b"CTATGAA".as_slice(), b"CTATTGACGTA".as_slice());
    let matrix = build(a, b, &scheme).unwrap();
    let paths = enumerate_optimal_paths(&matrix, a, b, &scheme).unwrap();
    let exporter = VectorExporter::new(deterministic_config());

    let dir = tempfile::tempdir().unwrap();
    let f1 = dir.path().join("a.svg");
    let f2 = dir.path().join("b.svg");

    exporter.export_scoring_svg(&f1, &matrix, a, b, &paths).unwrap();
    exporter.export_scoring_svg(&f2, &matrix, a, b, &paths).unwrap();

    let b1 = std::fs::read(&f1).unwrap();
    let b2 = std::fs::read(&f2).unwrap();
    assert_eq!(b1, b2, "SVG bytes differ between identical renders");
    assert_eq!(
        String::from_utf8(b1).unwrap(),
        exporter.render_scoring_svg(&matrix, a, b, &paths)
    );
}

#[test]
fn dot_svg_export_is_deterministic() {
    let protein1 = b"MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQANNLR";
    let protein2 = b"MKTAYIAKQRQISFVKSHFSRQLEER";
    let plot = DotPlot::new(protein1, protein2);
    let exporter = VectorExporter::new(deterministic_config());

    let dir = tempfile::tempdir().unwrap();
    let f1 = dir.path().join("a.svg");
    let f2 = dir.path().join("b.svg");

    exporter
        .export_dot_svg(&f1, &plot.matrix, &plot.diagonals, protein1, protein2)
        .unwrap();
    exporter
        .export_dot_svg(&f2, &plot.matrix, &plot.diagonals, protein1, protein2)
        .unwrap();

    assert_eq!(std::fs::read(&f1).unwrap(), std::fs::read(&f2).unwrap());
}

#[test]
fn export_to_missing_directory_fails() {
    let plot = DotPlot::new(b"AC", b"AC");
    let exporter = VectorExporter::new(deterministic_config());
    let result = exporter.export_dot_svg(
        "/nonexistent/dir/plot.svg",
        &plot.matrix,
        &plot.diagonals,
        b"AC",
        b"AC",
    );
    assert!(result.is_err());
}
