//! Publication cadence estimation.
//!
//! A deliberately coarse classifier: the mean gap between consecutive issues
//! is bucketed by fixed thresholds, and each bucket carries the gap expected
//! between issues at that cadence.

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Discrete publication frequency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum Cadence {
    #[strum(to_string = "Daily")]
    Daily,
    #[strum(to_string = "2-3 times per week")]
    SeveralWeekly,
    #[strum(to_string = "Weekly")]
    Weekly,
    #[strum(to_string = "Bi-weekly")]
    BiWeekly,
    #[strum(to_string = "Monthly or irregular")]
    MonthlyOrIrregular,
}

impl Cadence {
    /// Classify a mean gap in days. Boundary values fall into the more
    /// frequent class.
    pub fn classify(average_gap_days: f64) -> Self {
        if average_gap_days <= 1.5 {
            Self::Daily
        } else if average_gap_days <= 4.0 {
            Self::SeveralWeekly
        } else if average_gap_days <= 8.0 {
            Self::Weekly
        } else if average_gap_days <= 16.0 {
            Self::BiWeekly
        } else {
            Self::MonthlyOrIrregular
        }
    }

    /// Gap between issues, in days, expected at this cadence.
    pub fn expected_gap_days(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::SeveralWeekly => 3,
            Self::Weekly => 7,
            Self::BiWeekly => 14,
            Self::MonthlyOrIrregular => 30,
        }
    }
}

/// Inferred cadence of one newspaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyProfile {
    pub cadence: Cadence,
    pub average_gap_days: f64,
    pub min_gap_days: i64,
    pub max_gap_days: i64,
    /// Baseline used to flag significant gaps.
    pub expected_gap_days: i64,
    /// Dates the profile was computed from.
    pub issue_count: usize,
}

/// Day gaps between consecutive dates.
pub fn day_gaps(dates: &[NaiveDate]) -> Vec<i64> {
    dates
        .iter()
        .tuple_windows()
        .map(|(a, b)| (*b - *a).num_days())
        .collect()
}

/// Estimate the cadence of an ascending sequence of distinct dates.
///
/// Returns `None` for fewer than two dates; such newspapers are left out of
/// cadence-dependent analysis.
pub fn estimate(dates: &[NaiveDate]) -> Option<FrequencyProfile> {
    let gaps = day_gaps(dates);
    let (min_gap_days, max_gap_days) = gaps.iter().copied().minmax().into_option()?;
    let average_gap_days = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
    let cadence = Cadence::classify(average_gap_days);

    Some(FrequencyProfile {
        cadence,
        average_gap_days,
        min_gap_days,
        max_gap_days,
        expected_gap_days: cadence.expected_gap_days(),
        issue_count: dates.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(days: &[i64]) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(1964, 1, 1).unwrap();
        days.iter()
            .map(|d| start + chrono::Duration::days(*d))
            .collect()
    }

    #[test]
    fn test_boundaries_resolve_to_more_frequent_class() {
        assert_eq!(Cadence::classify(1.5), Cadence::Daily);
        assert_eq!(Cadence::classify(1.51), Cadence::SeveralWeekly);
        assert_eq!(Cadence::classify(4.0), Cadence::SeveralWeekly);
        assert_eq!(Cadence::classify(8.0), Cadence::Weekly);
        assert_eq!(Cadence::classify(16.0), Cadence::BiWeekly);
        assert_eq!(Cadence::classify(16.01), Cadence::MonthlyOrIrregular);
        assert_eq!(Cadence::classify(30.0), Cadence::MonthlyOrIrregular);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Cadence::Daily.to_string(), "Daily");
        assert_eq!(Cadence::SeveralWeekly.to_string(), "2-3 times per week");
        assert_eq!(Cadence::MonthlyOrIrregular.to_string(), "Monthly or irregular");
    }

    #[test]
    fn test_weekly_profile() {
        let profile = estimate(&dates(&[0, 7, 14, 22])).unwrap();
        assert_eq!(profile.cadence, Cadence::Weekly);
        assert_eq!(profile.expected_gap_days, 7);
        assert_eq!(profile.min_gap_days, 7);
        assert_eq!(profile.max_gap_days, 8);
        assert!((profile.average_gap_days - 22.0 / 3.0).abs() < 1e-9);
        assert_eq!(profile.issue_count, 4);
    }

    #[test]
    fn test_needs_two_dates() {
        assert!(estimate(&[]).is_none());
        assert!(estimate(&dates(&[0])).is_none());
        assert!(estimate(&dates(&[0, 1])).is_some());
    }
}
