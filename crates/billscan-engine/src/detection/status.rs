use chrono::NaiveDate;

use crate::detection::policy::DetectionPolicy;
use crate::types::{BillStatus, Transaction};

/// Resolve a bill's status from recency and recent gap variance.
///
/// Cancelled wins over irregular: once the last payment is older than the
/// staleness threshold, gap noise no longer matters.
pub fn evaluate_status(
    rows: &[Transaction],
    today: NaiveDate,
    policy: &DetectionPolicy,
) -> BillStatus {
    let mut dates: Vec<NaiveDate> = rows.iter().map(|row| row.date).collect();
    dates.sort_unstable();

    if let Some(last) = dates.last()
        && (today - *last).num_days() > policy.stale_after_days
    {
        return BillStatus::Cancelled;
    }

    if dates.len() >= 3 {
        let recent = &dates[dates.len() - 3..];
        let gaps = [
            (recent[1] - recent[0]).num_days() as f64,
            (recent[2] - recent[1]).num_days() as f64,
        ];
        if gap_variance(&gaps) > policy.irregular_gap_variance {
            return BillStatus::Irregular;
        }
    }

    BillStatus::Active
}

fn gap_variance(gaps: &[f64]) -> f64 {
    if gaps.is_empty() {
        return 0.0;
    }
    let mean = gaps.iter().sum::<f64>() / (gaps.len() as f64);
    gaps.iter().map(|gap| (gap - mean).powi(2)).sum::<f64>() / (gaps.len() as f64)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::detection::policy::DETECTION_POLICY_LIVE;
    use crate::types::{BillStatus, Transaction, TransactionKind};

    use super::evaluate_status;

    fn row(date: &str) -> Transaction {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d");
        assert!(parsed.is_ok());
        Transaction {
            id: date.to_string(),
            amount: -30.0,
            description: "DD".to_string(),
            date: parsed.unwrap_or(NaiveDate::MIN),
            merchant: "Grid Co".to_string(),
            category: None,
            account_id: "acct_1".to_string(),
            bank_name: None,
            kind: TransactionKind::Debit,
        }
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    #[test]
    fn recent_steady_payments_read_as_active() {
        let rows = vec![row("2026-04-01"), row("2026-05-01"), row("2026-06-01")];
        let status = evaluate_status(&rows, day("2026-06-20"), &DETECTION_POLICY_LIVE);
        assert_eq!(status, BillStatus::Active);
    }

    #[test]
    fn stale_payments_read_as_cancelled() {
        let rows = vec![row("2025-11-01"), row("2025-12-01"), row("2026-01-01")];
        let status = evaluate_status(&rows, day("2026-06-20"), &DETECTION_POLICY_LIVE);
        assert_eq!(status, BillStatus::Cancelled);
    }

    #[test]
    fn noisy_recent_gaps_read_as_irregular() {
        // Gaps of 7 and 42 days: variance well over the 100 day^2 threshold.
        let rows = vec![row("2026-05-01"), row("2026-05-08"), row("2026-06-19")];
        let status = evaluate_status(&rows, day("2026-06-25"), &DETECTION_POLICY_LIVE);
        assert_eq!(status, BillStatus::Irregular);
    }

    #[test]
    fn cancelled_wins_over_irregular() {
        let rows = vec![row("2025-10-01"), row("2025-10-08"), row("2025-11-19")];
        let status = evaluate_status(&rows, day("2026-06-20"), &DETECTION_POLICY_LIVE);
        assert_eq!(status, BillStatus::Cancelled);
    }

    #[test]
    fn two_payments_cannot_be_irregular() {
        let rows = vec![row("2026-05-01"), row("2026-06-12")];
        let status = evaluate_status(&rows, day("2026-06-20"), &DETECTION_POLICY_LIVE);
        assert_eq!(status, BillStatus::Active);
    }
}
