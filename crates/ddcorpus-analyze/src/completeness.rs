//! Per-issue page completeness.
//!
//! Page numbering is assumed to start at 1 with no offset, so an issue whose
//! only page is numbered 4 is missing pages 1 to 3.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use ddcorpus_core::{CorpusIndex, IssueDate, NewspaperCode};

/// Missing and duplicate pages of one issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCompleteness {
    /// Pages in `1..=max_page` with no image.
    pub missing: BTreeSet<u16>,
    /// Pages with more than one image.
    pub duplicates: BTreeSet<u16>,
    /// Highest page number seen, 0 for an empty multiset.
    pub max_page: u16,
    /// Images, duplicates included.
    pub total_pages: usize,
    /// Distinct page numbers.
    pub unique_pages: usize,
}

impl PageCompleteness {
    /// Share of `1..=max_page` present, 100 when `max_page` is 0.
    pub fn completeness_percent(&self) -> f64 {
        if self.max_page == 0 {
            100.0
        } else {
            self.unique_pages as f64 / f64::from(self.max_page) * 100.0
        }
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// No missing and no duplicate pages.
    pub fn is_complete(&self) -> bool {
        !self.has_missing() && !self.has_duplicates()
    }
}

/// Check one issue's page multiset.
pub fn check_pages(pages: &[u16]) -> PageCompleteness {
    let counts = pages.iter().copied().counts();
    let max_page = pages.iter().copied().max().unwrap_or(0);

    PageCompleteness {
        missing: (1..=max_page).filter(|p| !counts.contains_key(p)).collect(),
        duplicates: counts
            .iter()
            .filter(|&(_, &n)| n > 1)
            .map(|(&page, _)| page)
            .collect(),
        max_page,
        total_pages: pages.len(),
        unique_pages: counts.len(),
    }
}

/// An issue with missing or duplicate pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueProblem {
    pub newspaper: NewspaperCode,
    pub date: IssueDate,
    pub pages: PageCompleteness,
}

/// Issue completeness rolled up for one newspaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewspaperCompleteness {
    pub newspaper: NewspaperCode,
    pub total_issues: usize,
    pub complete_issues: usize,
    pub issues_with_missing: usize,
    pub issues_with_duplicates: usize,
    /// Missing pages summed over all issues.
    pub missing_pages: usize,
}

impl NewspaperCompleteness {
    /// Share of complete issues, 0 when there are none.
    pub fn complete_percent(&self) -> f64 {
        if self.total_issues == 0 {
            0.0
        } else {
            self.complete_issues as f64 / self.total_issues as f64 * 100.0
        }
    }
}

/// Completeness of every issue in an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Issues with missing or duplicate pages, by newspaper then date.
    pub problems: Vec<IssueProblem>,
    /// One rollup per newspaper, by code.
    pub newspapers: Vec<NewspaperCompleteness>,
    pub total_issues: usize,
    pub complete_issues: usize,
}

impl CompletenessReport {
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// Rollup for one newspaper.
    pub fn newspaper(&self, code: &NewspaperCode) -> Option<&NewspaperCompleteness> {
        self.newspapers.iter().find(|n| &n.newspaper == code)
    }
}

/// Runs [`check_pages`] over every issue of an index.
#[derive(Debug, Default)]
pub struct CompletenessChecker;

impl CompletenessChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, index: &CorpusIndex) -> CompletenessReport {
        let mut report = CompletenessReport::default();

        for newspaper in index.newspapers() {
            let mut rollup = NewspaperCompleteness {
                newspaper: newspaper.clone(),
                total_issues: 0,
                complete_issues: 0,
                issues_with_missing: 0,
                issues_with_duplicates: 0,
                missing_pages: 0,
            };

            for (date, pages) in index.issues(newspaper).into_iter().flatten() {
                let pages = check_pages(pages);
                rollup.total_issues += 1;
                rollup.missing_pages += pages.missing.len();
                if pages.has_missing() {
                    rollup.issues_with_missing += 1;
                }
                if pages.has_duplicates() {
                    rollup.issues_with_duplicates += 1;
                }
                if pages.is_complete() {
                    rollup.complete_issues += 1;
                } else {
                    report.problems.push(IssueProblem {
                        newspaper: newspaper.clone(),
                        date: *date,
                        pages,
                    });
                }
            }

            report.total_issues += rollup.total_issues;
            report.complete_issues += rollup.complete_issues;
            report.newspapers.push(rollup);
        }

        tracing::debug!(
            issues = report.total_issues,
            problems = report.problems.len(),
            "checked issue completeness"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_duplicates() {
        let result = check_pages(&[1, 2, 2, 4]);
        assert_eq!(result.missing, BTreeSet::from([3]));
        assert_eq!(result.duplicates, BTreeSet::from([2]));
        assert_eq!(result.max_page, 4);
        assert_eq!(result.total_pages, 4);
        assert_eq!(result.unique_pages, 3);
        assert_eq!(result.completeness_percent(), 75.0);
    }

    #[test]
    fn test_complete_issue() {
        let result = check_pages(&[3, 1, 2]);
        assert!(result.is_complete());
        assert_eq!(result.completeness_percent(), 100.0);
    }

    #[test]
    fn test_single_page_not_numbered_one() {
        let result = check_pages(&[4]);
        assert_eq!(result.missing, BTreeSet::from([1, 2, 3]));
        assert!(result.duplicates.is_empty());
    }

    #[test]
    fn test_empty_multiset() {
        let result = check_pages(&[]);
        assert_eq!(result.max_page, 0);
        assert!(result.missing.is_empty());
        assert_eq!(result.completeness_percent(), 100.0);
    }

    #[test]
    fn test_rollup_without_issues() {
        let rollup = NewspaperCompleteness {
            newspaper: NewspaperCode::new("TID").unwrap(),
            total_issues: 0,
            complete_issues: 0,
            issues_with_missing: 0,
            issues_with_duplicates: 0,
            missing_pages: 0,
        };
        assert_eq!(rollup.complete_percent(), 0.0);
    }
}
