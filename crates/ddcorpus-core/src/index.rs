//! Single-pass corpus index.
//!
//! A [`CorpusIndex`] is built fresh for every scan. Each decoded page is
//! folded into all dimensions at once, so the per-newspaper, per-year,
//! per-issue and per-library totals always agree with each other. Maps are
//! only ever grown through `entry(..).or_default()`; a key exists iff at
//! least one valid page produced it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::ParseFailure;
use crate::record::{IssueDate, LibraryCode, NewspaperCode, PageRecord};

/// What one library holds of one newspaper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryHolding {
    /// Pages supplied by the library.
    pub pages: u64,
    /// Distinct issue dates with at least one page from the library.
    pub issue_dates: BTreeSet<IssueDate>,
    /// Distinct years covered.
    pub years: BTreeSet<u16>,
    /// Distinct shelfmarks seen on the library's pages.
    pub shelfmarks: BTreeSet<CompactString>,
}

impl LibraryHolding {
    pub fn issue_count(&self) -> usize {
        self.issue_dates.len()
    }

    /// First and last year held.
    pub fn year_range(&self) -> Option<(u16, u16)> {
        Some((*self.years.first()?, *self.years.last()?))
    }
}

/// Issue and page counts for one year of a holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearHolding {
    pub issues: usize,
    pub pages: u64,
}

/// A file excluded from the index because its name did not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidFile {
    pub path: PathBuf,
    pub failure: ParseFailure,
}

impl InvalidFile {
    /// Human-readable diagnostic.
    pub fn diagnostic(&self) -> String {
        self.failure.to_string()
    }
}

/// Headline numbers for a whole corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_newspapers: usize,
    pub total_issues: usize,
    pub total_pages: u64,
    pub total_files: u64,
    pub invalid_files: usize,
    /// `None` for an empty corpus.
    pub average_pages_per_issue: Option<f64>,
    pub year_range: Option<(u16, u16)>,
}

/// Page index over one scan of a corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusIndex {
    /// newspaper -> year -> records
    records: BTreeMap<NewspaperCode, BTreeMap<u16, Vec<PageRecord>>>,
    /// newspaper -> issue date -> page numbers (a multiset)
    issues: BTreeMap<NewspaperCode, BTreeMap<IssueDate, Vec<u16>>>,
    pages_by_newspaper: BTreeMap<NewspaperCode, u64>,
    pages_by_newspaper_year: BTreeMap<NewspaperCode, BTreeMap<u16, u64>>,
    pages_by_year: BTreeMap<u16, u64>,
    /// library -> newspaper -> holding
    libraries: BTreeMap<LibraryCode, BTreeMap<NewspaperCode, LibraryHolding>>,
    invalid: Vec<InvalidFile>,
    valid_files: u64,
}

impl CorpusIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an unordered sequence of page file paths.
    ///
    /// Only the final path component is decoded. Paths are expected to be
    /// pre-filtered to supported extensions.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut index = Self::new();
        for path in paths {
            index.ingest(path);
        }
        index
    }

    /// Decode one path and fold it into the index.
    ///
    /// Returns whether the file was indexed. Files that fail to decode are
    /// recorded as invalid; this never aborts.
    pub fn ingest(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let outcome = codec::decode_path(path);
        self.record_outcome(path.to_path_buf(), outcome)
    }

    /// Fold an already-decoded outcome into the index.
    pub fn record_outcome(
        &mut self,
        path: PathBuf,
        outcome: Result<PageRecord, ParseFailure>,
    ) -> bool {
        match outcome {
            Ok(record) => {
                self.insert(record);
                true
            }
            Err(failure) => {
                self.insert_invalid(path, failure);
                false
            }
        }
    }

    /// Add one valid page to every dimension.
    pub fn insert(&mut self, record: PageRecord) {
        let newspaper = record.newspaper.clone();
        let year = record.year;
        let date = record.issue_date();

        self.issues
            .entry(newspaper.clone())
            .or_default()
            .entry(date)
            .or_default()
            .push(record.page);
        *self.pages_by_newspaper.entry(newspaper.clone()).or_default() += 1;
        *self
            .pages_by_newspaper_year
            .entry(newspaper.clone())
            .or_default()
            .entry(year)
            .or_default() += 1;
        *self.pages_by_year.entry(year).or_default() += 1;

        let holding = self
            .libraries
            .entry(record.library.clone())
            .or_default()
            .entry(newspaper.clone())
            .or_default();
        holding.pages += 1;
        holding.issue_dates.insert(date);
        holding.years.insert(year);
        if let Some(shelfmark) = &record.shelfmark {
            holding.shelfmarks.insert(shelfmark.clone());
        }

        self.records
            .entry(newspaper)
            .or_default()
            .entry(year)
            .or_default()
            .push(record);
        self.valid_files += 1;
    }

    /// Record a file whose name did not decode.
    pub fn insert_invalid(&mut self, path: PathBuf, failure: ParseFailure) {
        tracing::debug!(path = %path.display(), %failure, "rejected filename");
        self.invalid.push(InvalidFile { path, failure });
    }

    /// Files seen, valid or not.
    pub fn total_files(&self) -> u64 {
        self.valid_files + self.invalid.len() as u64
    }

    /// Files that decoded into a page record.
    pub fn valid_files(&self) -> u64 {
        self.valid_files
    }

    pub fn invalid_files(&self) -> &[InvalidFile] {
        &self.invalid
    }

    /// Newspaper codes in the index, sorted.
    pub fn newspapers(&self) -> impl Iterator<Item = &NewspaperCode> {
        self.records.keys()
    }

    pub fn newspaper_count(&self) -> usize {
        self.records.len()
    }

    /// Records of one newspaper grouped by year.
    pub fn records_by_year(&self, newspaper: &NewspaperCode) -> Option<&BTreeMap<u16, Vec<PageRecord>>> {
        self.records.get(newspaper)
    }

    /// Every record in the index, by newspaper then year.
    pub fn records(&self) -> impl Iterator<Item = &PageRecord> {
        self.records.values().flat_map(|years| years.values().flatten())
    }

    /// Issues of one newspaper with their page multisets, in date order.
    pub fn issues(&self, newspaper: &NewspaperCode) -> Option<&BTreeMap<IssueDate, Vec<u16>>> {
        self.issues.get(newspaper)
    }

    /// Every issue in the index with its page multiset.
    pub fn all_issues(&self) -> impl Iterator<Item = (&NewspaperCode, IssueDate, &[u16])> {
        self.issues.iter().flat_map(|(code, dates)| {
            dates
                .iter()
                .map(move |(date, pages)| (code, *date, pages.as_slice()))
        })
    }

    /// Page numbers of one issue, duplicates included.
    pub fn issue_pages(&self, newspaper: &NewspaperCode, date: IssueDate) -> Option<&[u16]> {
        self.issues.get(newspaper)?.get(&date).map(Vec::as_slice)
    }

    /// Distinct issue dates of one newspaper, ascending.
    pub fn issue_dates(&self, newspaper: &NewspaperCode) -> impl Iterator<Item = IssueDate> + '_ {
        self.issues
            .get(newspaper)
            .into_iter()
            .flat_map(|dates| dates.keys().copied())
    }

    pub fn issue_count(&self, newspaper: &NewspaperCode) -> usize {
        self.issues.get(newspaper).map_or(0, BTreeMap::len)
    }

    pub fn total_issues(&self) -> usize {
        self.issues.values().map(BTreeMap::len).sum()
    }

    /// Issue dates of one newspaper within `from..=to`.
    pub fn issues_between(
        &self,
        newspaper: &NewspaperCode,
        from: IssueDate,
        to: IssueDate,
    ) -> Vec<IssueDate> {
        if from > to {
            return Vec::new();
        }
        self.issues
            .get(newspaper)
            .map(|dates| dates.range(from..=to).map(|(date, _)| *date).collect())
            .unwrap_or_default()
    }

    pub fn pages_by_newspaper(&self) -> &BTreeMap<NewspaperCode, u64> {
        &self.pages_by_newspaper
    }

    pub fn page_count(&self, newspaper: &NewspaperCode) -> u64 {
        self.pages_by_newspaper.get(newspaper).copied().unwrap_or(0)
    }

    pub fn pages_by_year(&self) -> &BTreeMap<u16, u64> {
        &self.pages_by_year
    }

    pub fn pages_by_newspaper_year(&self, newspaper: &NewspaperCode) -> Option<&BTreeMap<u16, u64>> {
        self.pages_by_newspaper_year.get(newspaper)
    }

    /// Issue counts per year for one newspaper.
    pub fn issues_by_year(&self, newspaper: &NewspaperCode) -> BTreeMap<u16, usize> {
        let mut counts = BTreeMap::new();
        for date in self.issue_dates(newspaper) {
            *counts.entry(date.year).or_default() += 1;
        }
        counts
    }

    /// Issues published in `year` across all newspapers.
    pub fn issues_in_year(&self, year: u16) -> usize {
        self.issues
            .values()
            .map(|dates| dates.keys().filter(|d| d.year == year).count())
            .sum()
    }

    /// Number of newspapers with at least one page in `year`.
    pub fn newspapers_in_year(&self, year: u16) -> usize {
        self.records
            .values()
            .filter(|years| years.contains_key(&year))
            .count()
    }

    /// Years with pages for one newspaper, ascending.
    pub fn years(&self, newspaper: &NewspaperCode) -> impl Iterator<Item = u16> + '_ {
        self.records
            .get(newspaper)
            .into_iter()
            .flat_map(|years| years.keys().copied())
    }

    pub fn year_range(&self, newspaper: &NewspaperCode) -> Option<(u16, u16)> {
        let years = self.records.get(newspaper)?;
        Some((*years.keys().next()?, *years.keys().next_back()?))
    }

    pub fn corpus_year_range(&self) -> Option<(u16, u16)> {
        Some((
            *self.pages_by_year.keys().next()?,
            *self.pages_by_year.keys().next_back()?,
        ))
    }

    /// Pages per (year, month), split by newspaper.
    pub fn pages_by_month(&self) -> BTreeMap<(u16, u8), BTreeMap<NewspaperCode, u64>> {
        let mut months: BTreeMap<(u16, u8), BTreeMap<NewspaperCode, u64>> = BTreeMap::new();
        for record in self.records() {
            *months
                .entry((record.year, record.month))
                .or_default()
                .entry(record.newspaper.clone())
                .or_default() += 1;
        }
        months
    }

    /// library -> newspaper -> holding
    pub fn libraries(&self) -> &BTreeMap<LibraryCode, BTreeMap<NewspaperCode, LibraryHolding>> {
        &self.libraries
    }

    pub fn holding(&self, library: &LibraryCode, newspaper: &NewspaperCode) -> Option<&LibraryHolding> {
        self.libraries.get(library)?.get(newspaper)
    }

    /// Libraries holding at least one page of a newspaper, sorted.
    pub fn libraries_holding(&self, newspaper: &NewspaperCode) -> Vec<&LibraryCode> {
        self.libraries
            .iter()
            .filter(|(_, holdings)| holdings.contains_key(newspaper))
            .map(|(library, _)| library)
            .collect()
    }

    /// Year-by-year issues and pages one library holds of one newspaper.
    pub fn holding_by_year(
        &self,
        library: &LibraryCode,
        newspaper: &NewspaperCode,
    ) -> BTreeMap<u16, YearHolding> {
        let mut years: BTreeMap<u16, YearHolding> = BTreeMap::new();
        let Some(holding) = self.holding(library, newspaper) else {
            return years;
        };
        for date in &holding.issue_dates {
            years.entry(date.year).or_default().issues += 1;
        }
        if let Some(records) = self.records.get(newspaper) {
            for (year, pages) in records {
                let held = pages.iter().filter(|r| &r.library == library).count() as u64;
                if held > 0 {
                    years.entry(*year).or_default().pages += held;
                }
            }
        }
        years
    }

    pub fn summary(&self) -> CorpusSummary {
        let total_issues = self.total_issues();
        let total_pages: u64 = self.pages_by_newspaper.values().sum();
        CorpusSummary {
            total_newspapers: self.newspaper_count(),
            total_issues,
            total_pages,
            total_files: self.total_files(),
            invalid_files: self.invalid.len(),
            average_pages_per_issue: (total_issues > 0)
                .then(|| total_pages as f64 / total_issues as f64),
            year_range: self.corpus_year_range(),
        }
    }

    /// Check that every dimension accounts for exactly the valid files.
    pub fn is_consistent(&self) -> bool {
        let by_newspaper: u64 = self.pages_by_newspaper.values().sum();
        let by_year: u64 = self.pages_by_year.values().sum();
        let by_newspaper_year: u64 = self
            .pages_by_newspaper_year
            .values()
            .flat_map(BTreeMap::values)
            .sum();
        let by_issue: u64 = self
            .issues
            .values()
            .flat_map(BTreeMap::values)
            .map(|pages| pages.len() as u64)
            .sum();
        let by_library: u64 = self
            .libraries
            .values()
            .flat_map(BTreeMap::values)
            .map(|h| h.pages)
            .sum();
        let records = self.records().count() as u64;

        [by_year, by_newspaper_year, by_issue, by_library, records]
            .iter()
            .all(|&n| n == by_newspaper)
            && by_newspaper == self.valid_files
    }
}
