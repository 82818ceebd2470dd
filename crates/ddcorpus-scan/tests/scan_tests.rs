use ddcorpus_core::{Field, NewspaperCode};
use ddcorpus_scan::{CorpusScanner, ScanConfig, validate_directory};
use std::fs;
use tempfile::TempDir;

fn corpus_with(names: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for name in names {
        fs::write(temp.path().join(name), b"").unwrap();
    }
    temp
}

#[test]
fn test_malformed_code_is_isolated() {
    let temp = corpus_with(&[
        "ABCD_1964_01_09_001_SB.jpg",
        "TID_1964_01_09_001_SB.jpg",
        "TID_1964_01_09_002_SB.jpg",
    ]);

    let snapshot = CorpusScanner::new()
        .scan(&ScanConfig::new(temp.path()))
        .unwrap();
    let index = &snapshot.index;

    assert_eq!(index.valid_files(), 2);
    assert_eq!(index.invalid_files().len(), 1);
    let invalid = &index.invalid_files()[0];
    assert_eq!(invalid.failure.field(), Field::NewspaperCode);
    assert!(invalid.diagnostic().contains("newspaper code"));
    assert!(invalid.path.ends_with("ABCD_1964_01_09_001_SB.jpg"));
}

#[test]
fn test_scan_totals_are_consistent() {
    let temp = corpus_with(&[
        "TID_1964_01_09_001_SB.jpg",
        "TID_1964_01_09_001_BL.jpg",
        "TID_1965_02_30_001_SB.png",
        "QTN_1959_03_02_001_CU.pdf",
        "QTN_1959_03_02_003_CU.pdf",
        "readme.md",
    ]);

    let snapshot = CorpusScanner::new()
        .scan(&ScanConfig::new(temp.path()))
        .unwrap();
    let index = &snapshot.index;

    let by_newspaper: u64 = index.pages_by_newspaper().values().sum();
    let by_year: u64 = index.pages_by_year().values().sum();
    assert_eq!(by_newspaper, 5);
    assert_eq!(by_year, 5);
    assert_eq!(index.valid_files(), 5);
    assert!(index.is_consistent());

    let tid = NewspaperCode::new("TID").unwrap();
    assert_eq!(index.issue_count(&tid), 2);
}

#[test]
fn test_hidden_files_can_be_skipped() {
    let temp = corpus_with(&["TID_1964_01_09_001_SB.jpg", ".TID_1964_01_09_002_SB.jpg"]);

    let all = CorpusScanner::new()
        .scan(&ScanConfig::new(temp.path()))
        .unwrap();
    assert_eq!(all.index.total_files(), 2);

    let config = ScanConfig::builder()
        .root(temp.path())
        .include_hidden(false)
        .build()
        .unwrap();
    let visible = CorpusScanner::new().scan(&config).unwrap();
    assert_eq!(visible.index.total_files(), 1);
}

#[test]
fn test_validate_reports_diagnostics_and_suggestions() {
    let temp = corpus_with(&[
        "TID_1964_01_09_001_SB.jpg",
        "tid_1964_1_9_1_sb.jpg",
        "TID_64_01_09_001_SB.jpg",
        "notes.txt",
    ]);

    let config = ScanConfig::new(temp.path());
    let report = validate_directory(&config, true).unwrap();

    assert_eq!(report.valid.len(), 1);
    assert_eq!(report.invalid.len(), 2);
    assert_eq!(report.total(), 3);
    assert!(!report.is_clean());

    let fixable: Vec<_> = report.fixable().collect();
    assert_eq!(fixable.len(), 2);
    let lowercase = report
        .invalid
        .iter()
        .find(|e| e.path.ends_with("tid_1964_1_9_1_sb.jpg"))
        .unwrap();
    assert!(lowercase.diagnostic.contains("newspaper code"));
    assert_eq!(
        lowercase.suggestion.as_deref(),
        Some("TID_1964_01_09_001_SB.jpg")
    );
}

#[test]
fn test_validate_without_suggestions() {
    let temp = corpus_with(&["tid_1964_01_09_001_SB.jpg"]);

    let report = validate_directory(&ScanConfig::new(temp.path()), false).unwrap();

    assert_eq!(report.invalid.len(), 1);
    assert!(report.invalid[0].suggestion.is_none());
}
