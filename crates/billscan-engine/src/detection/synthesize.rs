use chrono::NaiveDate;

use crate::detection::classify::assign_category;
use crate::detection::cluster::AmountCluster;
use crate::detection::due::next_due_date;
use crate::detection::frequency::FrequencyPattern;
use crate::detection::normalize::title_case;
use crate::detection::policy::DetectionPolicy;
use crate::detection::status::evaluate_status;
use crate::error::EngineResult;
use crate::types::DetectedBill;

/// Identifier scheme for a bill, chosen by whichever detection pass found it.
///
/// Both forms are deterministic functions of stable inputs so repeated runs
/// over the same transactions yield the same ids.
#[derive(Debug, Clone, Copy)]
pub enum BillKey {
    Cadence,
    CalendarDay(u32),
}

/// Build a `DetectedBill` from a cluster and its detected pattern.
///
/// Overall confidence averages the pattern confidence with amount
/// consistency (how close the cluster mean sits to the representative
/// amount), clamped to [0, 1]. Fails only when the due date cannot be rolled
/// into the future within the policy bound.
pub fn synthesize_bill(
    merchant_key: &str,
    cluster: &AmountCluster,
    pattern: &FrequencyPattern,
    key: BillKey,
    today: NaiveDate,
    policy: &DetectionPolicy,
) -> EngineResult<DetectedBill> {
    let mut rows = cluster.rows.clone();
    rows.sort_by(|left, right| left.date.cmp(&right.date).then_with(|| left.id.cmp(&right.id)));

    let mean = cluster.mean_amount();
    let confidence = clamp01(
        (pattern.confidence + amount_consistency(cluster.representative_amount, mean)) / 2.0,
    );

    let id = match key {
        BillKey::Cadence => format!("{merchant_key}|{}", pattern.frequency.as_str()),
        BillKey::CalendarDay(day) => format!("{merchant_key}|day{day}"),
    };

    let last = &rows[rows.len() - 1];
    let last_payment_date = last.date;
    let account_id = last.account_id.clone();
    let bank_name = last.bank_name.clone();

    let category = assign_category(merchant_key, &rows[0].description);
    let status = evaluate_status(&rows, today, policy);
    let next_due = next_due_date(
        last_payment_date,
        pattern.frequency,
        pattern.day_of_month,
        today,
        policy.due_date_roll_limit,
    )?;

    Ok(DetectedBill {
        id,
        name: bill_name(merchant_key, &category),
        merchant: merchant_key.to_string(),
        amount: round_to(mean, 2),
        frequency: pattern.frequency,
        category,
        next_due_date: next_due,
        last_payment_date,
        account_id,
        bank_name,
        confidence: round_to(confidence, 4),
        evidence: rows,
        status,
        average_amount: mean,
        day_of_month: pattern.day_of_month,
        day_of_week: pattern.day_of_week,
    })
}

fn bill_name(merchant_key: &str, category: &str) -> String {
    let base = title_case(merchant_key);
    match category {
        "Subscriptions" => format!("{base} Subscription"),
        "Utilities" => format!("{base} Utility"),
        "Insurance" => format!("{base} Insurance"),
        _ => base,
    }
}

fn amount_consistency(representative: f64, mean: f64) -> f64 {
    if representative.abs() <= f64::EPSILON {
        return 0.0;
    }
    clamp01(1.0 - (representative - mean).abs() / representative.abs())
}

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals).unwrap_or(2);
    let factor = 10_f64.powi(exponent);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::detection::cluster::AmountCluster;
    use crate::detection::frequency::FrequencyPattern;
    use crate::detection::policy::DETECTION_POLICY_LIVE;
    use crate::types::{BillFrequency, BillStatus, Transaction, TransactionKind};

    use super::{BillKey, synthesize_bill};

    fn row(date: &str, amount: f64) -> Transaction {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d");
        assert!(parsed.is_ok());
        Transaction {
            id: format!("txn_{date}"),
            amount,
            description: "DIRECT DEBIT".to_string(),
            date: parsed.unwrap_or(NaiveDate::MIN),
            merchant: "NETFLIX.COM".to_string(),
            category: None,
            account_id: "acct_1".to_string(),
            bank_name: Some("Monzo".to_string()),
            kind: TransactionKind::Debit,
        }
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    fn monthly_pattern() -> FrequencyPattern {
        FrequencyPattern {
            frequency: BillFrequency::Monthly,
            confidence: 1.0,
            day_of_month: Some(15),
            day_of_week: None,
        }
    }

    #[test]
    fn cadence_key_builds_a_stable_composite_id() {
        let cluster = AmountCluster {
            representative_amount: 9.99,
            rows: vec![row("2026-04-15", -9.99), row("2026-05-15", -9.99)],
        };
        let bill = synthesize_bill(
            "netflix com",
            &cluster,
            &monthly_pattern(),
            BillKey::Cadence,
            day("2026-06-01"),
            &DETECTION_POLICY_LIVE,
        );
        assert!(bill.is_ok());
        if let Ok(found) = bill {
            assert_eq!(found.id, "netflix com|monthly");
            assert_eq!(found.name, "Netflix Com Subscription");
            assert_eq!(found.category, "Subscriptions");
            assert_eq!(found.status, BillStatus::Active);
            assert_eq!(found.next_due_date, day("2026-06-15"));
            assert_eq!(found.last_payment_date, day("2026-05-15"));
            assert_eq!(found.bank_name, Some("Monzo".to_string()));
            assert_eq!(found.confidence, 1.0);
        }
    }

    #[test]
    fn calendar_day_key_uses_the_day_form() {
        let cluster = AmountCluster {
            representative_amount: 9.99,
            rows: vec![row("2026-04-15", -9.99), row("2026-05-15", -9.99)],
        };
        let bill = synthesize_bill(
            "netflix com",
            &cluster,
            &monthly_pattern(),
            BillKey::CalendarDay(15),
            day("2026-06-01"),
            &DETECTION_POLICY_LIVE,
        );
        assert!(bill.is_ok());
        if let Ok(found) = bill {
            assert_eq!(found.id, "netflix com|day15");
        }
    }

    #[test]
    fn loose_amounts_drag_confidence_down() {
        let cluster = AmountCluster {
            representative_amount: 40.0,
            rows: vec![row("2026-04-15", -40.0), row("2026-05-15", -48.0)],
        };
        let bill = synthesize_bill(
            "netflix com",
            &cluster,
            &monthly_pattern(),
            BillKey::Cadence,
            day("2026-06-01"),
            &DETECTION_POLICY_LIVE,
        );
        assert!(bill.is_ok());
        if let Ok(found) = bill {
            // mean 44.0, consistency 0.9, pattern 1.0 -> 0.95
            assert!((found.confidence - 0.95).abs() < 1e-9);
            assert_eq!(found.amount, 44.0);
            assert!((found.average_amount - 44.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn evidence_is_sorted_by_date() {
        let cluster = AmountCluster {
            representative_amount: 9.99,
            rows: vec![row("2026-05-15", -9.99), row("2026-04-15", -9.99)],
        };
        let bill = synthesize_bill(
            "netflix com",
            &cluster,
            &monthly_pattern(),
            BillKey::Cadence,
            day("2026-06-01"),
            &DETECTION_POLICY_LIVE,
        );
        assert!(bill.is_ok());
        if let Ok(found) = bill {
            assert_eq!(found.evidence[0].date, day("2026-04-15"));
        }
    }
}
