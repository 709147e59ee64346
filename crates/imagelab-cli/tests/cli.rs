#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::{Command, Output};

use imagelab_core::artifact::encode_png_data_uri;

fn cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imagelab-cli"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch imagelab-cli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn write_png(path: &Path, width: u32, height: u32) {
    image::GrayImage::from_pixel(width, height, image::Luma([200]))
        .save(path)
        .unwrap();
}

#[test]
fn mask_prints_identity_grid() {
    let output = cli(&["mask", "--kind", "identity", "--size", "3"]);
    assert!(output.status.success());
    let rows: Vec<Vec<f64>> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        rows,
        vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0]
        ]
    );
}

#[test]
fn mask_rounds_even_size_up() {
    let output = cli(&["mask", "--kind", "gaussian", "--size", "4"]);
    assert!(output.status.success());
    let rows: Vec<Vec<f64>> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.len(), 5);
    let total: f64 = rows.iter().flatten().sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn unknown_preset_is_rejected() {
    let output = cli(&["mask", "--kind", "emboss"]);
    assert!(!output.status.success());
}

#[test]
fn levels_reports_budget() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.png");
    write_png(&path, 640, 64);

    let output = cli(&["levels", path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("640x64"), "{text}");
    assert!(text.contains("max levels 4"), "{text}");
}

#[test]
fn levels_fails_on_non_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"not an image").unwrap();

    let output = cli(&["levels", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("notes.png"));
}

#[test]
fn url_honours_api_override() {
    let output = cli(&["--api-url", "https://lab.example/", "url", "median-filter"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "https://lab.example/api/median-filter");
}

#[test]
fn url_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"apiBaseUrl":"http://backend:9000"}"#).unwrap();

    let output = cli(&["url", "blend", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "http://backend:9000/image/blend");
}

#[test]
fn extract_writes_primary_and_pyramid_levels() {
    let dir = tempfile::tempdir().unwrap();
    let uri = encode_png_data_uri(b"level");
    let body = serde_json::json!({
        "gaussianPyramid": [uri, uri],
        "laplacianPyramid": [uri],
        "reconstructedImage": encode_png_data_uri(b"reconstructed"),
    });
    let response = dir.path().join("pyramids.json");
    std::fs::write(&response, body.to_string()).unwrap();
    let out_dir = dir.path().join("out");

    let output = cli(&[
        "extract",
        "--operation",
        "pyramids",
        "--response",
        response.to_str().unwrap(),
        "--source",
        "tree.jpg",
        "--out-dir",
        out_dir.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        std::fs::read(out_dir.join("tree_reconstructed.png")).unwrap(),
        b"reconstructed"
    );
    assert!(out_dir.join("tree_reconstructed_gaussian_pyramid_1.png").exists());
    assert!(out_dir.join("tree_reconstructed_laplacian_pyramid_0.png").exists());
    assert_eq!(stdout(&output).lines().count(), 4);
}

#[test]
fn extract_uses_explicit_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let body = serde_json::json!({ "processedImage": encode_png_data_uri(b"edges") });
    let response = dir.path().join("canny.json");
    std::fs::write(&response, body.to_string()).unwrap();

    let output = cli(&[
        "extract",
        "--operation",
        "canny-edge",
        "--response",
        response.to_str().unwrap(),
        "--source",
        "road.png",
        "--suffix",
        "_edges",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(
        std::fs::read(dir.path().join("road_edges.png")).unwrap(),
        b"edges"
    );
}

#[test]
fn histogram_summarizes_series() {
    let dir = tempfile::tempdir().unwrap();
    let mut original = vec![0.0; 256];
    original[42] = 900.0;
    let body = serde_json::json!({
        "processedImage": encode_png_data_uri(b"x"),
        "originalHistogram": original,
        "originalCumulative": vec![1.0; 256],
        "processedHistogram": vec![0.0; 256],
        "processedCumulative": [],
    });
    let response = dir.path().join("equalize.json");
    std::fs::write(&response, body.to_string()).unwrap();

    let output = cli(&[
        "histogram",
        "--operation",
        "equalize",
        response.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Original:"), "{text}");
    assert!(text.contains("peak at intensity 42 (900)"), "{text}");
    assert!(text.contains("Processed:"), "{text}");
    assert!(text.contains("histogram: no data"), "{text}");
}

#[test]
fn extract_writes_matching_inputs_beside_result() {
    let dir = tempfile::tempdir().unwrap();
    let body = serde_json::json!({
        "imageA": encode_png_data_uri(b"a"),
        "imageB": encode_png_data_uri(b"b"),
        "transformedImage": encode_png_data_uri(b"t"),
        "mapping": vec![0; 256],
    });
    let response = dir.path().join("match.json");
    std::fs::write(&response, body.to_string()).unwrap();

    let output = cli(&[
        "extract",
        "--operation",
        "2pointer",
        "--response",
        response.to_str().unwrap(),
        "--source",
        "dusk.png",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(std::fs::read(dir.path().join("dusk_matched.png")).unwrap(), b"t");
    assert_eq!(
        std::fs::read(dir.path().join("dusk_matched_image_b.png")).unwrap(),
        b"b"
    );
}

#[test]
fn histogram_reports_mapping_and_filters() {
    let dir = tempfile::tempdir().unwrap();
    let mut mapping = vec![-1; 256];
    mapping[..10].fill(3);
    let body = serde_json::json!({
        "imageA": "a",
        "imageB": "b",
        "transformedImage": "t",
        "histogramA": vec![1.0; 256],
        "mapping": mapping,
    });
    let response = dir.path().join("match.json");
    std::fs::write(&response, body.to_string()).unwrap();

    let output = cli(&["histogram", "--operation", "2pointer", response.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("mapping: 10 of 256 intensities mapped"), "{text}");
    assert!(text.contains("Image A:"), "{text}");

    let body = serde_json::json!({
        "processedImage": "p",
        "processedHistogram": vec![2.0; 256],
        "appliedFilters": ["min", "max"],
    });
    let response = dir.path().join("filter.json");
    std::fs::write(&response, body.to_string()).unwrap();

    let output = cli(&["histogram", "--operation", "apply-filter", response.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("applied filters: min, max"));
}
