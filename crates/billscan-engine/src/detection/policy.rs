use std::time::Duration;

use crate::types::BillFrequency;

/// Deterministic detection-policy identifier.
///
/// Emitted alongside results in debug logging so threshold changes remain
/// auditable across releases.
pub const DETECTION_POLICY_VERSION: &str = "detection/v1";

/// Threshold set for one deployment of the detection pipeline.
///
/// Two divergent threshold sets exist in the wild for this engine; they are
/// exposed here as named presets rather than merged. `DETECTION_POLICY_LIVE`
/// is canonical and is what `detect_bills` uses; `DETECTION_POLICY_HISTORICAL`
/// suits bulk-imported statement archives where long silences are expected.
#[derive(Debug, Clone, Copy)]
pub struct DetectionPolicy {
    /// Minimum cluster size before a merchant amount-cluster is considered.
    pub min_occurrences: usize,
    /// Fraction of consecutive day-gaps that must match a cadence.
    pub min_gap_match_fraction: f64,
    /// Looser fraction for the bi-weekly fallback signature.
    pub biweekly_match_fraction: f64,
    /// Days since the last payment before a bill reads as cancelled.
    pub stale_after_days: i64,
    /// Gap variance (day^2) over the three most recent payments above which
    /// a bill reads as irregular.
    pub irregular_gap_variance: f64,
    /// Relative amount spread tolerated by the same-calendar-day pass.
    pub sameday_amount_spread: f64,
    /// Fixed confidence assigned to same-calendar-day candidates.
    pub sameday_confidence: f64,
    /// Acceptance floor for the quick single-transaction heuristic.
    pub quick_min_confidence: f64,
    /// Hard cap on due-date roll-forward iterations.
    pub due_date_roll_limit: u32,
    /// Most-recent transactions fetched per scheduler invocation.
    pub fetch_limit: usize,
    /// Minimum elapsed time between non-forced full analyses.
    pub cooldown: Duration,
    gap_tolerance_weekly: i64,
    gap_tolerance_monthly: i64,
    gap_tolerance_quarterly: i64,
    gap_tolerance_yearly: i64,
}

impl DetectionPolicy {
    pub const fn gap_tolerance_days(&self, frequency: BillFrequency) -> i64 {
        match frequency {
            BillFrequency::Weekly => self.gap_tolerance_weekly,
            BillFrequency::Monthly => self.gap_tolerance_monthly,
            BillFrequency::Quarterly => self.gap_tolerance_quarterly,
            BillFrequency::Yearly => self.gap_tolerance_yearly,
        }
    }
}

pub const DETECTION_POLICY_LIVE: DetectionPolicy = DetectionPolicy {
    min_occurrences: 2,
    min_gap_match_fraction: 0.4,
    biweekly_match_fraction: 0.3,
    stale_after_days: 60,
    irregular_gap_variance: 100.0,
    sameday_amount_spread: 0.15,
    sameday_confidence: 0.6,
    quick_min_confidence: 0.5,
    due_date_roll_limit: 1_000,
    fetch_limit: 2_000,
    cooldown: Duration::from_secs(5 * 60),
    gap_tolerance_weekly: 3,
    gap_tolerance_monthly: 10,
    gap_tolerance_quarterly: 15,
    gap_tolerance_yearly: 30,
};

pub const DETECTION_POLICY_HISTORICAL: DetectionPolicy = DetectionPolicy {
    min_occurrences: 2,
    min_gap_match_fraction: 0.5,
    biweekly_match_fraction: 0.3,
    stale_after_days: 180,
    irregular_gap_variance: 100.0,
    sameday_amount_spread: 0.15,
    sameday_confidence: 0.6,
    quick_min_confidence: 0.3,
    due_date_roll_limit: 1_000,
    fetch_limit: 2_000,
    cooldown: Duration::from_secs(5 * 60),
    gap_tolerance_weekly: 4,
    gap_tolerance_monthly: 12,
    gap_tolerance_quarterly: 20,
    gap_tolerance_yearly: 40,
};
