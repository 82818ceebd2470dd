//! Analysis algorithms for ddcorpus.
//!
//! This crate derives facts from a scanned [`CorpusIndex`]:
//!
//! - **Issue completeness** - missing and duplicate pages per issue
//! - **Cadence** - inferred publication frequency per newspaper
//! - **Missing issues** - issues likely absent, estimated from date gaps
//!
//! # Issue Completeness
//!
//! Pages of an issue are expected to run from 1 to the highest page seen:
//!
//! ```
//! use ddcorpus_analyze::check_pages;
//!
//! let result = check_pages(&[1, 2, 2, 4]);
//! assert_eq!(result.missing.iter().copied().collect::<Vec<_>>(), vec![3]);
//! assert_eq!(result.duplicates.iter().copied().collect::<Vec<_>>(), vec![2]);
//! ```
//!
//! # Missing Issues
//!
//! The mean gap between issues picks a cadence and its baseline gap. Gaps
//! longer than twice the baseline are flagged:
//!
//! ```rust,ignore
//! use ddcorpus_analyze::MissingIssueAnalyzer;
//! use ddcorpus_scan::{CorpusScanner, ScanConfig};
//!
//! let snapshot = CorpusScanner::new().scan(&ScanConfig::new("/corpus")).unwrap();
//! let report = MissingIssueAnalyzer::new().analyze(&snapshot.index);
//!
//! for paper in &report.newspapers {
//!     println!("{}: {} ({} missing)", paper.newspaper, paper.profile.cadence, paper.estimated_missing);
//! }
//! ```

mod cadence;
mod completeness;
mod gaps;
mod report;

pub use cadence::{Cadence, FrequencyProfile, day_gaps, estimate};
pub use completeness::{
    CompletenessChecker, CompletenessReport, IssueProblem, NewspaperCompleteness,
    PageCompleteness, check_pages,
};
pub use gaps::{
    ExcludedNewspaper, GapConfig, GapConfigBuilder, IssueGap, MissingIssueAnalyzer,
    MissingIssuesReport, NewspaperGaps, calendar_dates, estimate_missing, estimated_completeness,
    find_coverage_gaps,
};
pub use report::{CorpusReport, HoldingEntry, InvalidFileEntry, LibraryEntry, NewspaperEntry};

// Re-export core types
pub use ddcorpus_core::{CorpusIndex, IssueDate, NewspaperCode};
