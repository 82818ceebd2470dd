//! Aggregated, serializable corpus report.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::Serialize;

use ddcorpus_core::{
    CorpusIndex, CorpusSummary, LibraryCode, NewspaperCode, NewspaperMetadata, ReferenceTables,
};

use crate::cadence::Cadence;
use crate::completeness::{CompletenessChecker, NewspaperCompleteness};
use crate::gaps::{GapConfig, MissingIssueAnalyzer, MissingIssuesReport};

/// One newspaper as shown in the report.
#[derive(Debug, Clone, Serialize)]
pub struct NewspaperEntry {
    pub code: NewspaperCode,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NewspaperMetadata>,
    pub issues: usize,
    pub pages: u64,
    pub year_range: Option<(u16, u16)>,
    pub pages_by_year: BTreeMap<u16, u64>,
    /// `None` when the newspaper has fewer than two dated issues.
    pub average_gap_days: Option<f64>,
    pub cadence: Option<Cadence>,
    pub libraries: Vec<LibraryCode>,
}

/// What one library holds of one newspaper.
#[derive(Debug, Clone, Serialize)]
pub struct HoldingEntry {
    pub newspaper: NewspaperCode,
    pub name: String,
    pub pages: u64,
    pub issues: usize,
    pub year_range: Option<(u16, u16)>,
    pub shelfmarks: BTreeSet<CompactString>,
}

/// One holding library as shown in the report.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    pub code: LibraryCode,
    pub name: String,
    pub pages: u64,
    pub issues: usize,
    pub newspapers: Vec<HoldingEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvalidFileEntry {
    pub path: PathBuf,
    pub diagnostic: String,
}

/// Everything the analyzers know about a corpus, in one structure.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub generated_at: DateTime<Utc>,
    pub summary: CorpusSummary,
    pub newspapers: Vec<NewspaperEntry>,
    pub pages_by_year: BTreeMap<u16, u64>,
    pub libraries: Vec<LibraryEntry>,
    pub completeness: Vec<NewspaperCompleteness>,
    pub missing_issues: MissingIssuesReport,
    pub invalid_files: Vec<InvalidFileEntry>,
}

impl CorpusReport {
    /// Build a report with the default gap configuration.
    pub fn build(index: &CorpusIndex, tables: &ReferenceTables) -> Self {
        Self::build_with(index, tables, GapConfig::default())
    }

    pub fn build_with(index: &CorpusIndex, tables: &ReferenceTables, gaps: GapConfig) -> Self {
        let missing_issues = MissingIssueAnalyzer::with_config(gaps).analyze(index);
        let completeness = CompletenessChecker::new().check(index).newspapers;

        let newspapers = index
            .newspapers()
            .map(|code| {
                let profile = missing_issues.newspaper(code).map(|n| &n.profile);
                NewspaperEntry {
                    code: code.clone(),
                    name: tables.newspaper_name(code),
                    metadata: tables.newspaper_metadata(code).cloned(),
                    issues: index.issue_count(code),
                    pages: index.page_count(code),
                    year_range: index.year_range(code),
                    pages_by_year: index.pages_by_newspaper_year(code).cloned().unwrap_or_default(),
                    average_gap_days: profile.map(|p| p.average_gap_days),
                    cadence: profile.map(|p| p.cadence),
                    libraries: index.libraries_holding(code).into_iter().cloned().collect(),
                }
            })
            .collect();

        let libraries = index
            .libraries()
            .iter()
            .map(|(code, holdings)| {
                let newspapers: Vec<HoldingEntry> = holdings
                    .iter()
                    .map(|(newspaper, holding)| HoldingEntry {
                        newspaper: newspaper.clone(),
                        name: tables.newspaper_name(newspaper),
                        pages: holding.pages,
                        issues: holding.issue_count(),
                        year_range: holding.year_range(),
                        shelfmarks: holding.shelfmarks.clone(),
                    })
                    .collect();
                LibraryEntry {
                    code: code.clone(),
                    name: tables.library_name(code).to_string(),
                    pages: newspapers.iter().map(|h| h.pages).sum(),
                    issues: newspapers.iter().map(|h| h.issues).sum(),
                    newspapers,
                }
            })
            .collect();

        let invalid_files = index
            .invalid_files()
            .iter()
            .map(|file| InvalidFileEntry {
                path: file.path.clone(),
                diagnostic: file.diagnostic(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            summary: index.summary(),
            newspapers,
            pages_by_year: index.pages_by_year().clone(),
            libraries,
            completeness,
            missing_issues,
            invalid_files,
        }
    }
}
