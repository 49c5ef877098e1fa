use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::detection::policy::DetectionPolicy;
use crate::types::{BillFrequency, Transaction};

/// Cadence inferred from the day-gaps inside one amount cluster.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyPattern {
    pub frequency: BillFrequency,
    /// Matching-gap fraction for a direct cadence hit, or the fixed fallback
    /// confidence (0.6 bi-weekly, 0.5 short-mean-gap).
    pub confidence: f64,
    pub day_of_month: Option<u32>,
    /// ISO weekday, 1 = Monday.
    pub day_of_week: Option<u32>,
}

const BIWEEKLY_INTERVAL_DAYS: i64 = 14;
const BIWEEKLY_TOLERANCE_DAYS: i64 = 3;
const SHORT_MEAN_GAP_DAYS: f64 = 25.0;

/// Infer a cadence from consecutive day-gaps within a cluster.
///
/// Canonical cadences are tested in order (weekly, monthly, quarterly,
/// yearly) and the first whose matching-gap fraction clears the policy
/// threshold wins. Failing that, a bi-weekly signature or a short mean gap
/// still reads as monthly at reduced confidence; otherwise there is no
/// pattern and the cluster is dropped by the caller.
pub fn detect_frequency(
    rows: &[Transaction],
    policy: &DetectionPolicy,
) -> Option<FrequencyPattern> {
    let dates = sorted_dates(rows);
    if dates.len() < 2 {
        return None;
    }
    let gaps = day_gaps(&dates);

    for frequency in [
        BillFrequency::Weekly,
        BillFrequency::Monthly,
        BillFrequency::Quarterly,
        BillFrequency::Yearly,
    ] {
        let fraction = matching_fraction(
            &gaps,
            frequency.expected_interval_days(),
            policy.gap_tolerance_days(frequency),
        );
        if fraction >= policy.min_gap_match_fraction {
            return Some(FrequencyPattern {
                frequency,
                confidence: fraction,
                day_of_month: (frequency == BillFrequency::Monthly)
                    .then(|| modal_day_of_month(&dates)),
                day_of_week: (frequency == BillFrequency::Weekly)
                    .then(|| modal_day_of_week(&dates)),
            });
        }
    }

    let biweekly_fraction =
        matching_fraction(&gaps, BIWEEKLY_INTERVAL_DAYS, BIWEEKLY_TOLERANCE_DAYS);
    if biweekly_fraction >= policy.biweekly_match_fraction {
        return Some(FrequencyPattern {
            frequency: BillFrequency::Monthly,
            confidence: 0.6,
            day_of_month: Some(modal_day_of_month(&dates)),
            day_of_week: None,
        });
    }

    let mean_gap = (gaps.iter().sum::<i64>() as f64) / (gaps.len() as f64);
    if mean_gap <= SHORT_MEAN_GAP_DAYS {
        return Some(FrequencyPattern {
            frequency: BillFrequency::Monthly,
            confidence: 0.5,
            day_of_month: Some(modal_day_of_month(&dates)),
            day_of_week: None,
        });
    }

    None
}

fn sorted_dates(rows: &[Transaction]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = rows.iter().map(|row| row.date).collect();
    dates.sort_unstable();
    dates
}

fn day_gaps(sorted_dates: &[NaiveDate]) -> Vec<i64> {
    let mut gaps = Vec::with_capacity(sorted_dates.len().saturating_sub(1));
    for index in 1..sorted_dates.len() {
        gaps.push((sorted_dates[index] - sorted_dates[index - 1]).num_days());
    }
    gaps
}

fn matching_fraction(gaps: &[i64], expected_days: i64, tolerance_days: i64) -> f64 {
    if gaps.is_empty() {
        return 0.0;
    }
    let matches = gaps
        .iter()
        .filter(|gap| (**gap - expected_days).abs() <= tolerance_days)
        .count();
    (matches as f64) / (gaps.len() as f64)
}

/// Most common calendar day among the dates; ties resolve to the smaller day.
pub fn modal_day_of_month(dates: &[NaiveDate]) -> u32 {
    modal_value(dates.iter().map(|date| date.day()))
}

/// Most common ISO weekday among the dates; ties resolve to the smaller day.
pub fn modal_day_of_week(dates: &[NaiveDate]) -> u32 {
    modal_value(dates.iter().map(|date| date.weekday().number_from_monday()))
}

fn modal_value(values: impl Iterator<Item = u32>) -> u32 {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|left, right| left.1.cmp(&right.1).then(right.0.cmp(&left.0)))
        .map(|(value, _)| value)
        .unwrap_or(1)
}
