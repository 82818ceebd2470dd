use ddcorpus_core::{
    CorpusIndex, Field, ImageExtension, IssueDate, LibraryCode, NewspaperCode, PageRecord,
    ParseFailure, ReferenceTables, ScanConfig, decode, encode,
};
use std::io::Write;

fn record(code: &str, date: (u16, u8, u8), page: u16, lib: &str, shelf: Option<&str>) -> PageRecord {
    PageRecord::new(
        NewspaperCode::new(code).unwrap(),
        IssueDate::new(date.0, date.1, date.2),
        page,
        LibraryCode::new(lib).unwrap(),
        shelf,
        ImageExtension::Jpg,
    )
}

#[test]
fn test_encode_then_decode_restores_record() {
    let samples = [
        record("TID", (1964, 1, 9), 1, "SB", Some("Zsn128")),
        record("QTN", (1959, 12, 31), 999, "CU", None),
        record("KDN", (1956, 2, 30), 12, "BL", Some("Or_1234_b")),
    ];
    for original in samples {
        let name = encode(&original).unwrap();
        assert_eq!(decode(&name).unwrap(), original, "round trip of {name}");
    }
}

#[test]
fn test_decode_then_encode_restores_lowercase_name() {
    for name in [
        "TID_1964_01_09_001_SB.jpg",
        "TID_1964_01_09_001_SB_Zsn128_vol_2.tiff",
        "GDN_1970_06_15_004_LT.pdf",
    ] {
        let record = decode(name).unwrap();
        assert_eq!(encode(&record).unwrap(), name);
    }
    let record = decode("TID_1964_01_09_001_SB.JPG").unwrap();
    assert_eq!(encode(&record).unwrap(), "TID_1964_01_09_001_SB.jpg");
}

#[test]
fn test_diagnostics_follow_field_order() {
    let cases = [
        ("TID_1964_01_09_001", Field::Layout),
        ("TIDE_1964_01_09_001_SB", Field::NewspaperCode),
        ("TID_64_01_09_001_SB", Field::Year),
        ("TID_1964_13_09_001_SB", Field::Month),
        ("TID_1964_01_9_001_SB", Field::Day),
        ("TID_1964_01_09_1_SB", Field::Page),
        ("TID_1964_01_09_001_S", Field::LibraryCode),
        ("TID_1964_01_09_001_SB_", Field::Shelfmark),
    ];
    for (stem, field) in cases {
        let err = decode(&format!("{stem}.jpg")).unwrap_err();
        assert_eq!(err.field(), field, "field for {stem}");
    }
    assert!(matches!(
        decode("TID_1964_01_09_001_SB.gif"),
        Err(ParseFailure::UnsupportedExtension { .. })
    ));
}

#[test]
fn test_invalid_file_does_not_abort_indexing() {
    let index = CorpusIndex::from_paths([
        "corpus/TID/1964/TID_1964_01_09_001_SB.jpg",
        "corpus/TID/1964/ABCD_1964_01_09_001_SB.jpg",
        "corpus/TID/1964/TID_1964_01_09_002_SB.jpg",
    ]);

    assert_eq!(index.total_files(), 3);
    assert_eq!(index.valid_files(), 2);
    assert_eq!(index.invalid_files().len(), 1);
    assert!(index.invalid_files()[0].diagnostic().contains("newspaper code"));
    assert!(index.is_consistent());
}

#[test]
fn test_index_summary_and_ranges() {
    let index = CorpusIndex::from_paths([
        "TID_1964_01_09_001_SB.jpg",
        "TID_1964_01_09_002_SB.jpg",
        "TID_1965_05_01_001_SB.jpg",
        "QTN_1959_03_02_001_CU.tif",
        "QTN_1959_03_02_002_CU.tif",
        "QTN_1959_03_02_003_CU.tif",
    ]);
    let summary = index.summary();
    assert_eq!(summary.total_newspapers, 2);
    assert_eq!(summary.total_issues, 3);
    assert_eq!(summary.total_pages, 6);
    assert_eq!(summary.average_pages_per_issue, Some(2.0));
    assert_eq!(summary.year_range, Some((1959, 1965)));

    let tid = NewspaperCode::new("TID").unwrap();
    assert_eq!(index.year_range(&tid), Some((1964, 1965)));
    assert_eq!(index.issues_by_year(&tid)[&1964], 1);
    assert_eq!(index.newspapers_in_year(1959), 1);
    assert_eq!(index.issues_in_year(1964), 1);
}

#[test]
fn test_index_serializes_to_json() {
    let index = CorpusIndex::from_paths(["TID_1964_01_09_001_SB_Zsn1.jpg"]);
    let json = serde_json::to_string(&index).unwrap();
    assert!(json.contains("\"1964-01-09\""));
    assert!(json.contains("Zsn1"));
}

#[test]
fn test_reference_tables_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[newspapers.ABC]\nname = \"Alphabet Courier\"\n\n[libraries]\nXX = \"Example Library\""
    )
    .unwrap();

    let tables = ReferenceTables::load(file.path()).unwrap();
    assert_eq!(
        tables.newspaper_name(&NewspaperCode::new("ABC").unwrap()),
        "Alphabet Courier"
    );
    assert_eq!(
        tables.newspaper_name(&NewspaperCode::new("TID").unwrap()),
        "Unknown (TID)"
    );
}

#[test]
fn test_scan_config_defaults() {
    let config = ScanConfig::new("/corpus");
    assert!(!config.follow_symlinks);
    assert!(config.max_depth.is_none());
    assert!(config.include_hidden);
    assert_eq!(config.threads, 0);
}
