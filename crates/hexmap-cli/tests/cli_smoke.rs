use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("dataview").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("hexmap-cli"))
}

#[test]
fn renders_svg_to_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("map.svg");

    cli()
        .args([
            "render",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("states_sales.json").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    assert_eq!(doc.root_element().attribute("class"), Some("hexmap"));
    let groups = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("hexagons"))
        .count();
    assert_eq!(groups, 51);
}

#[test]
fn view_model_json_keeps_input_order() {
    let output = cli()
        .args([
            "view-model",
            fixture("states_sales.json").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let vm: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let cats: Vec<_> = vm["dataPoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["category"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(cats, vec!["CA", "Texas", "ZZ"]);
    assert_eq!(vm["meta"]["measureBound"], true);
}

#[test]
fn bare_data_view_from_stdin_uses_viewport_flags() {
    let input = fs::read_to_string(fixture("states_only.json")).unwrap();
    let output = cli()
        .args([
            "frame",
            "--viewport-width",
            "400",
            "--viewport-height",
            "300",
            "-",
        ])
        .write_stdin(input)
        .output()
        .expect("run");
    assert!(output.status.success());

    let frame: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(frame["width"], 400.0);
    assert_eq!(frame["height"], 300.0);
    assert_eq!(frame["measureBound"], false);
}

#[test]
fn select_dims_other_regions() {
    let output = cli()
        .args([
            "frame",
            "--select",
            "TX",
            fixture("states_sales.json").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let frame: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let regions = frame["regions"].as_array().unwrap();
    let opacity = |key: &str| {
        regions
            .iter()
            .find(|r| r["key"] == key)
            .and_then(|r| r["opacity"].as_f64())
            .unwrap()
    };
    assert_eq!(opacity("Texas"), 1.0);
    assert_eq!(opacity("California"), 0.2);
}

#[test]
fn usage_errors_exit_with_code_2() {
    cli().args(["--bogus"]).assert().code(2);
    cli().args(["frame", "--viewport-width"]).assert().code(2);
    cli()
        .args(["frame", "--viewport-width", "wide"])
        .assert()
        .code(2);
}

#[test]
fn bad_input_exits_with_code_1() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    cli().arg(bad.to_string_lossy().as_ref()).assert().code(1);

    cli()
        .args([
            "--select",
            "Atlantis",
            fixture("states_sales.json").to_string_lossy().as_ref(),
        ])
        .assert()
        .code(1);
}
