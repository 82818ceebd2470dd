//! Page filename codec.
//!
//! Filenames follow `CODE_YYYY_MM_DD_PPP_LIB[_SHELFMARK].EXT`:
//!
//! | part | form |
//! |---|---|
//! | `CODE` | 3 uppercase letters |
//! | `YYYY` | 4 digits |
//! | `MM` | 2 digits, 01-12 |
//! | `DD` | 2 digits, 01-31 (not checked against month length) |
//! | `PPP` | 3 digits, 001-999 |
//! | `LIB` | 2 uppercase letters |
//! | `SHELFMARK` | everything after the library code, underscores included |
//! | `EXT` | jpg, jpeg, png, tif, tiff or pdf, any case |

use std::path::Path;

use crate::error::{Field, InvalidField, ParseFailure};
use crate::record::{ImageExtension, IssueDate, LibraryCode, NewspaperCode, PageRecord};

/// Extensions accepted by the codec, lowercase and dot-prefixed.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".tif", ".tiff", ".pdf"];

/// Check whether a path carries one of the supported page extensions.
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.parse::<ImageExtension>().is_ok())
}

/// Decode a bare filename (no directory part) into a page record.
///
/// On failure the error names the first field, left to right, that breaks
/// its sub-pattern.
pub fn decode(filename: &str) -> Result<PageRecord, ParseFailure> {
    let (stem, ext) = filename
        .rsplit_once('.')
        .ok_or(ParseFailure::MissingExtension)?;
    let extension: ImageExtension =
        ext.parse()
            .map_err(|_| ParseFailure::UnsupportedExtension {
                ext: ext.to_string(),
            })?;

    let parts: Vec<&str> = stem.splitn(7, '_').collect();
    if parts.len() < 6 {
        return Err(ParseFailure::TooFewParts { found: parts.len() });
    }

    let newspaper = NewspaperCode::new(parts[0]).map_err(|_| ParseFailure::NewspaperCode {
        value: parts[0].to_string(),
    })?;
    let year = fixed_digits(parts[1], 4).ok_or_else(|| ParseFailure::Year {
        value: parts[1].to_string(),
    })?;
    let month = fixed_digits(parts[2], 2)
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| ParseFailure::Month {
            value: parts[2].to_string(),
        })?;
    let day = fixed_digits(parts[3], 2)
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| ParseFailure::Day {
            value: parts[3].to_string(),
        })?;
    let page = fixed_digits(parts[4], 3)
        .filter(|p| *p >= 1)
        .ok_or_else(|| ParseFailure::Page {
            value: parts[4].to_string(),
        })?;
    let library = LibraryCode::new(parts[5]).map_err(|_| ParseFailure::LibraryCode {
        value: parts[5].to_string(),
    })?;

    let shelfmark = match parts.get(6) {
        Some(&"") => return Err(ParseFailure::EmptyShelfmark),
        other => other.copied(),
    };

    Ok(PageRecord::new(
        newspaper,
        IssueDate::new(year, month as u8, day as u8),
        page,
        library,
        shelfmark,
        extension,
    ))
}

/// Decode the final component of a path.
///
/// Non-UTF-8 names are decoded lossily and so fail on the field holding the
/// replacement character.
pub fn decode_path(path: &Path) -> Result<PageRecord, ParseFailure> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    decode(&name)
}

/// Encode a record into its canonical filename.
///
/// Numeric fields are zero-padded to their fixed widths, the shelfmark is
/// appended only when present, and the extension is written in lowercase.
pub fn encode(record: &PageRecord) -> Result<String, InvalidField> {
    if record.year > 9999 {
        return Err(InvalidField::new(
            Field::Year,
            format!("{} does not fit in 4 digits", record.year),
        ));
    }
    if !(1..=12).contains(&record.month) {
        return Err(InvalidField::new(
            Field::Month,
            format!("{} is outside 1-12", record.month),
        ));
    }
    if !(1..=31).contains(&record.day) {
        return Err(InvalidField::new(
            Field::Day,
            format!("{} is outside 1-31", record.day),
        ));
    }
    if !(1..=999).contains(&record.page) {
        return Err(InvalidField::new(
            Field::Page,
            format!("{} is outside 1-999", record.page),
        ));
    }

    let mut filename = format!(
        "{}_{:04}_{:02}_{:02}_{:03}_{}",
        record.newspaper, record.year, record.month, record.day, record.page, record.library
    );
    if let Some(shelfmark) = record.shelfmark.as_deref().filter(|s| !s.is_empty()) {
        filename.push('_');
        filename.push_str(shelfmark);
    }
    filename.push('.');
    filename.push_str(&record.extension.to_string());
    Ok(filename)
}

/// Suggest a corrected filename for a malformed one.
///
/// Only mechanical repairs are attempted: upper-casing the letter codes and
/// zero-padding numbers that are already in range. Returns `None` as soon as
/// any field cannot be repaired that way, or when the repaired name is the
/// input unchanged.
pub fn suggest_fix(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    let extension: ImageExtension = ext.parse().ok()?;

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 6 {
        return None;
    }

    let newspaper = recover_letters::<NewspaperCode>(parts[0], NewspaperCode::LEN)?;
    let year = recover_number(parts[1]).filter(|y| *y <= 9999)?;
    let month = recover_number(parts[2]).filter(|m| (1..=12).contains(m))?;
    let day = recover_number(parts[3]).filter(|d| (1..=31).contains(d))?;
    let page = recover_number(parts[4]).filter(|p| (1..=999).contains(p))?;
    let library = recover_letters::<LibraryCode>(parts[5], LibraryCode::LEN)?;
    let shelfmark = parts[6..].join("_");

    let record = PageRecord::new(
        newspaper,
        IssueDate::new(year as u16, month as u8, day as u8),
        page as u16,
        library,
        Some(shelfmark.as_str()),
        extension,
    );
    let suggested = encode(&record).ok()?;
    (suggested != filename).then_some(suggested)
}

/// Parse exactly `width` ASCII digits.
fn fixed_digits(s: &str, width: usize) -> Option<u16> {
    if s.len() == width && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Parse any run of ASCII digits, ignoring its width.
fn recover_number(s: &str) -> Option<u32> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Upper-case a letter code of the right length.
fn recover_letters<T: std::str::FromStr>(s: &str, len: usize) -> Option<T> {
    if s.len() == len && s.bytes().all(|b| b.is_ascii_alphabetic()) {
        s.to_ascii_uppercase().parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_name() {
        let record = decode("TID_1964_01_09_001_SB_Zsn128162MR.jpg").unwrap();
        assert_eq!(record.newspaper.as_str(), "TID");
        assert_eq!(record.year, 1964);
        assert_eq!(record.month, 1);
        assert_eq!(record.day, 9);
        assert_eq!(record.page, 1);
        assert_eq!(record.library.as_str(), "SB");
        assert_eq!(record.shelfmark.as_deref(), Some("Zsn128162MR"));
        assert_eq!(record.extension, ImageExtension::Jpg);
    }

    #[test]
    fn test_shelfmark_keeps_underscores() {
        let record = decode("QTN_1965_05_15_002_CU_box_3_folder_2.TIF").unwrap();
        assert_eq!(record.shelfmark.as_deref(), Some("box_3_folder_2"));
        assert_eq!(record.extension, ImageExtension::Tif);
    }

    #[test]
    fn test_decode_without_shelfmark() {
        let record = decode("TID_1964_01_09_012_SB.png").unwrap();
        assert!(record.shelfmark.is_none());
        assert_eq!(record.page, 12);
    }

    #[test]
    fn test_no_calendar_validation() {
        let record = decode("TID_1964_02_30_001_SB.jpg").unwrap();
        assert_eq!(record.issue_date().to_string(), "1964-02-30");
    }

    #[test]
    fn test_diagnostics_name_first_bad_field() {
        let cases = [
            ("TID_1964_01_09_001", Field::Extension),
            ("TID_1964_01_09_001_SB.gif", Field::Extension),
            ("TID_1964_01_09.jpg", Field::Layout),
            ("ABCD_1964_01_09_001_SB.jpg", Field::NewspaperCode),
            ("tid_1964_01_09_001_SB.jpg", Field::NewspaperCode),
            ("TID_64_01_09_001_SB.jpg", Field::Year),
            ("TID_1964_13_09_001_SB.jpg", Field::Month),
            ("TID_1964_00_09_001_SB.jpg", Field::Month),
            ("TID_1964_1_09_001_SB.jpg", Field::Month),
            ("TID_1964_01_32_001_SB.jpg", Field::Day),
            ("TID_1964_01_09_01_SB.jpg", Field::Page),
            ("TID_1964_01_09_000_SB.jpg", Field::Page),
            ("TID_1964_01_09_001_S.jpg", Field::LibraryCode),
            ("TID_1964_01_09_001_sb.jpg", Field::LibraryCode),
            ("TID_1964_01_09_001_SB_.jpg", Field::Shelfmark),
        ];
        for (name, field) in cases {
            let failure = decode(name).unwrap_err();
            assert_eq!(failure.field(), field, "{name}: {failure}");
        }
    }

    #[test]
    fn test_year_diagnostic_text() {
        let failure = decode("TID_64_01_09_001_SB.jpg").unwrap_err();
        assert!(failure.to_string().to_lowercase().contains("year"));
    }

    #[test]
    fn test_encode_pads_fields() {
        let record = PageRecord::new(
            NewspaperCode::new("TID").unwrap(),
            IssueDate::new(1964, 1, 9),
            1,
            LibraryCode::new("SB").unwrap(),
            Some("Zsn128162MR"),
            ImageExtension::Jpg,
        );
        assert_eq!(encode(&record).unwrap(), "TID_1964_01_09_001_SB_Zsn128162MR.jpg");
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        let mut record = decode("TID_1964_01_09_001_SB.jpg").unwrap();
        record.month = 13;
        assert_eq!(encode(&record).unwrap_err().field, Field::Month);

        let mut record = decode("TID_1964_01_09_001_SB.jpg").unwrap();
        record.page = 1000;
        assert_eq!(encode(&record).unwrap_err().field, Field::Page);

        let mut record = decode("TID_1964_01_09_001_SB.jpg").unwrap();
        record.year = 10_000;
        assert_eq!(encode(&record).unwrap_err().field, Field::Year);

        let mut record = decode("TID_1964_01_09_001_SB.jpg").unwrap();
        record.day = 0;
        assert_eq!(encode(&record).unwrap_err().field, Field::Day);
    }

    #[test]
    fn test_uppercase_extension_round_trips_to_same_record() {
        let record = decode("TID_1964_01_09_001_SB.JPEG").unwrap();
        let encoded = encode(&record).unwrap();
        assert_eq!(encoded, "TID_1964_01_09_001_SB.jpeg");
        assert_eq!(decode(&encoded).unwrap(), record);
    }

    #[test]
    fn test_suggest_fix_repairs_case_and_padding() {
        assert_eq!(
            suggest_fix("tid_1964_1_9_1_sb_Zsn1.jpg").as_deref(),
            Some("TID_1964_01_09_001_SB_Zsn1.jpg")
        );
        assert_eq!(
            suggest_fix("TID_1964_01_09_001_SB_.jpg").as_deref(),
            Some("TID_1964_01_09_001_SB.jpg")
        );
    }

    #[test]
    fn test_suggest_fix_refuses_unrecoverable() {
        assert!(suggest_fix("ABCD_1964_01_09_001_SB.jpg").is_none());
        assert!(suggest_fix("TID_1964_13_09_001_SB.jpg").is_none());
        assert!(suggest_fix("TID_19640_01_09_001_SB.jpg").is_none());
        assert!(suggest_fix("TID_1964_01_09_0001x_SB.jpg").is_none());
        assert!(suggest_fix("T1D_1964_01_09_001_SB.jpg").is_none());
        assert!(suggest_fix("TID_1964_01_09_001.jpg").is_none());
        assert!(suggest_fix("TID_1964_01_09_001_SB.gif").is_none());
    }

    #[test]
    fn test_suggest_fix_none_when_unchanged() {
        assert!(suggest_fix("TID_1964_01_09_001_SB.jpg").is_none());
    }

    #[test]
    fn test_supported_extension() {
        assert!(is_supported_extension(Path::new("/a/b/TID_1964_01_09_001_SB.TIFF")));
        assert!(is_supported_extension(Path::new("scan.pdf")));
        assert!(!is_supported_extension(Path::new("notes.txt")));
        assert!(!is_supported_extension(Path::new("README")));
    }
}
