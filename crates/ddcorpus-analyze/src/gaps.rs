//! Missing-issue estimation from gaps in the issue sequence.
//!
//! A gap is significant when it exceeds twice the cadence baseline. Each
//! significant gap is credited with `floor(gap / baseline) - 1` missing
//! issues. The estimate cannot tell a suspension of publication from issues
//! lost to history.

use chrono::NaiveDate;
use derive_builder::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use ddcorpus_core::{CorpusIndex, IssueDate, NewspaperCode};

use crate::cadence::{self, FrequencyProfile};

/// A gap between consecutive issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueGap {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub gap_days: i64,
    /// Issues expected inside the gap at the baseline cadence, 0 for
    /// coverage gaps.
    pub estimated_missing: u64,
}

/// Gaps strictly longer than twice `expected_gap_days`, with the issues
/// each is estimated to be missing.
pub fn estimate_missing(dates: &[NaiveDate], expected_gap_days: i64) -> Vec<IssueGap> {
    if expected_gap_days <= 0 {
        return Vec::new();
    }
    dates
        .iter()
        .tuple_windows()
        .filter_map(|(from, to)| {
            let gap_days = (*to - *from).num_days();
            (gap_days > 2 * expected_gap_days).then(|| IssueGap {
                from: *from,
                to: *to,
                gap_days,
                estimated_missing: (gap_days / expected_gap_days - 1).max(0) as u64,
            })
        })
        .collect()
}

/// Gaps strictly longer than `threshold_days`, whatever the cadence.
pub fn find_coverage_gaps(dates: &[NaiveDate], threshold_days: i64) -> Vec<IssueGap> {
    dates
        .iter()
        .tuple_windows()
        .filter_map(|(from, to)| {
            let gap_days = (*to - *from).num_days();
            (gap_days > threshold_days).then(|| IssueGap {
                from: *from,
                to: *to,
                gap_days,
                estimated_missing: 0,
            })
        })
        .collect()
}

/// `observed / (observed + missing) * 100`, 100 when nothing is missing.
pub fn estimated_completeness(observed: usize, estimated_missing: u64) -> f64 {
    if estimated_missing == 0 {
        100.0
    } else {
        observed as f64 / (observed as f64 + estimated_missing as f64) * 100.0
    }
}

/// Configuration for missing-issue analysis.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct GapConfig {
    /// Gaps longer than this many days are reported as coverage gaps.
    #[builder(default = "60")]
    pub coverage_gap_days: i64,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            coverage_gap_days: 60,
        }
    }
}

impl GapConfig {
    /// Create a new config builder.
    pub fn builder() -> GapConfigBuilder {
        GapConfigBuilder::default()
    }
}

/// Missing-issue estimate for one newspaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewspaperGaps {
    pub newspaper: NewspaperCode,
    pub profile: FrequencyProfile,
    /// Significant gaps at the profile's baseline.
    pub significant_gaps: Vec<IssueGap>,
    pub coverage_gaps: Vec<IssueGap>,
    pub estimated_missing: u64,
    pub estimated_completeness: f64,
    /// Issue dates that are not real calendar days and were left out.
    pub skipped_dates: Vec<IssueDate>,
}

/// Why a newspaper has no estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedNewspaper {
    pub newspaper: NewspaperCode,
    /// Calendar-valid issue dates available.
    pub issue_count: usize,
}

/// Missing-issue estimates for a whole index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingIssuesReport {
    pub newspapers: Vec<NewspaperGaps>,
    /// Newspapers with fewer than two calendar-valid issue dates.
    pub excluded: Vec<ExcludedNewspaper>,
    pub total_estimated_missing: u64,
}

impl MissingIssuesReport {
    pub fn newspaper(&self, code: &NewspaperCode) -> Option<&NewspaperGaps> {
        self.newspapers.iter().find(|n| &n.newspaper == code)
    }
}

/// Calendar dates of one newspaper's issues, with the ones that are not
/// real days split out.
pub fn calendar_dates(
    index: &CorpusIndex,
    newspaper: &NewspaperCode,
) -> (Vec<NaiveDate>, Vec<IssueDate>) {
    let mut dates = Vec::new();
    let mut skipped = Vec::new();
    for date in index.issue_dates(newspaper) {
        match date.to_naive() {
            Some(naive) => dates.push(naive),
            None => skipped.push(date),
        }
    }
    (dates, skipped)
}

/// Runs the cadence and gap estimators over every newspaper of an index.
#[derive(Debug, Default)]
pub struct MissingIssueAnalyzer {
    config: GapConfig,
}

impl MissingIssueAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GapConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, index: &CorpusIndex) -> MissingIssuesReport {
        let mut report = MissingIssuesReport::default();

        for newspaper in index.newspapers() {
            let (dates, skipped_dates) = calendar_dates(index, newspaper);
            for date in &skipped_dates {
                tracing::warn!(
                    %newspaper,
                    %date,
                    "issue date is not a calendar day; skipped from gap analysis"
                );
            }

            let Some(profile) = cadence::estimate(&dates) else {
                report.excluded.push(ExcludedNewspaper {
                    newspaper: newspaper.clone(),
                    issue_count: dates.len(),
                });
                continue;
            };

            let significant_gaps = estimate_missing(&dates, profile.expected_gap_days);
            let estimated_missing: u64 =
                significant_gaps.iter().map(|g| g.estimated_missing).sum();
            report.total_estimated_missing += estimated_missing;

            report.newspapers.push(NewspaperGaps {
                newspaper: newspaper.clone(),
                coverage_gaps: find_coverage_gaps(&dates, self.config.coverage_gap_days),
                estimated_completeness: estimated_completeness(dates.len(), estimated_missing),
                profile,
                significant_gaps,
                estimated_missing,
                skipped_dates,
            });
        }

        tracing::debug!(
            analyzed = report.newspapers.len(),
            excluded = report.excluded.len(),
            missing = report.total_estimated_missing,
            "estimated missing issues"
        );
        report
    }
}
