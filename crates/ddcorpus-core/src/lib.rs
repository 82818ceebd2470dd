//! Core types for ddcorpus.
//!
//! This crate holds the page filename codec, the typed page record, the
//! single-pass [`CorpusIndex`] and the configuration shared by the scanner
//! and the analyzers.
//!
//! Page images are named
//! `{CODE}_{YYYY}_{MM}_{DD}_{PPP}_{LIB}[_{SHELFMARK}].{ext}`:
//!
//! ```
//! use ddcorpus_core::{decode, encode};
//!
//! let record = decode("TID_1964_01_09_001_SB_Zsn128.jpg").unwrap();
//! assert_eq!(record.newspaper.as_str(), "TID");
//! assert_eq!(record.page, 1);
//! assert_eq!(encode(&record).unwrap(), "TID_1964_01_09_001_SB_Zsn128.jpg");
//! ```

mod codec;
mod config;
mod error;
mod index;
mod record;
mod reference;
mod snapshot;

pub use codec::{
    SUPPORTED_EXTENSIONS, decode, decode_path, encode, is_supported_extension, suggest_fix,
};
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{
    Field, InvalidField, InvalidIssueDate, ParseFailure, ReferenceError, ScanError, ScanWarning,
    WarningKind,
};
pub use index::{CorpusIndex, CorpusSummary, InvalidFile, LibraryHolding, YearHolding};
pub use record::{ImageExtension, IssueDate, IssueKey, LibraryCode, NewspaperCode, PageRecord};
pub use reference::{NewspaperInfo, NewspaperMetadata, ReferenceTables};
pub use snapshot::{CorpusSnapshot, WalkStats};
