use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn ddc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ddc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn corpus() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("TID");
    fs::create_dir(&dir).unwrap();
    for name in [
        "TID_1964_01_01_001_SB.jpg",
        "TID_1964_01_01_002_SB.jpg",
        "TID_1964_01_08_001_SB.jpg",
        "TID_1964_01_08_003_SB.jpg",
        "TID_1964_01_30_001_SB.jpg",
        "tid_1964_02_06_001_sb.jpg",
    ] {
        fs::write(dir.join(name), b"").unwrap();
    }
    temp
}

#[test]
fn test_name_builds_canonical_filename() {
    let output = ddc(&["name", "TID", "1964-01-09", "1", "SB", "--shelfmark", "Zsn128"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "TID_1964_01_09_001_SB_Zsn128.jpg"
    );
}

#[test]
fn test_name_rejects_bad_code() {
    let output = ddc(&["name", "tid", "1964-01-09", "1", "SB"]);
    assert!(!output.status.success());
}

#[test]
fn test_name_rejects_page_out_of_range() {
    let output = ddc(&["name", "TID", "1964-01-09", "1000", "SB"]);
    assert!(!output.status.success());
}

#[test]
fn test_scan_json_summary() {
    let temp = corpus();
    let root = temp.path().to_str().unwrap();

    let output = ddc(&["scan", root, "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["total_pages"], 5);
    assert_eq!(value["summary"]["invalid_files"], 1);
    assert_eq!(value["pages_by_newspaper"]["TID"], 5);
}

#[test]
fn test_validate_suggests_fix() {
    let temp = corpus();
    let root = temp.path().to_str().unwrap();

    let output = ddc(&["validate", root, "--suggest"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 invalid"));
    assert!(stdout.contains("suggested: TID_1964_02_06_001_SB.jpg"));
}

#[test]
fn test_missing_text_report() {
    let temp = corpus();
    let root = temp.path().to_str().unwrap();

    let output = ddc(&["missing", root]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tibet Daily"));
}

#[test]
fn test_export_writes_report_file() {
    let temp = corpus();
    let root = temp.path().to_str().unwrap();
    let out = temp.path().join("report.json");

    let output = ddc(&["export", root, "-o", out.to_str().unwrap()]);
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["summary"]["total_issues"], 3);
    assert_eq!(value["completeness"][0]["issues_with_missing"], 1);
}

#[test]
fn test_custom_reference_tables() {
    let temp = corpus();
    let tables = temp.path().join("tables.toml");
    fs::write(&tables, "[newspapers.TID]\nname = \"Custom Daily\"\n").unwrap();

    let output = ddc(&[
        "--tables",
        tables.to_str().unwrap(),
        "completeness",
        temp.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Custom Daily"));
}
