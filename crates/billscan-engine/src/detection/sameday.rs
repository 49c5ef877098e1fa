use std::collections::BTreeMap;

use chrono::Datelike;

use crate::detection::cluster::{AmountCluster, cluster_by_amount};
use crate::detection::normalize::normalize_merchant;
use crate::detection::policy::DetectionPolicy;
use crate::types::Transaction;

/// A merchant that keeps charging on the same calendar day of the month.
#[derive(Debug, Clone)]
pub struct SameDayCandidate {
    pub merchant_key: String,
    pub day_of_month: u32,
    pub cluster: AmountCluster,
}

/// Second detection pass, independent of interval analysis.
///
/// Debits are grouped purely by calendar day-of-month, then by normalized
/// merchant, then into amount sub-groups. A sub-group qualifies with three
/// occurrences outright, or two occurrences that span more than one calendar
/// month (two charges on the same day of the same month are one event, not a
/// cadence).
pub fn detect_same_day_candidates(
    transactions: &[Transaction],
    policy: &DetectionPolicy,
) -> Vec<SameDayCandidate> {
    let mut by_day_and_merchant: BTreeMap<(u32, String), Vec<Transaction>> = BTreeMap::new();
    for transaction in transactions {
        if !transaction.is_debit() {
            continue;
        }
        let Some(merchant_key) = normalize_merchant(&transaction.merchant) else {
            continue;
        };
        by_day_and_merchant
            .entry((transaction.date.day(), merchant_key))
            .or_default()
            .push(transaction.clone());
    }

    let mut candidates: Vec<SameDayCandidate> = Vec::new();
    for ((day_of_month, merchant_key), rows) in by_day_and_merchant {
        for cluster in cluster_by_amount(&rows, policy.sameday_amount_spread, 2) {
            if qualifies(&cluster) {
                candidates.push(SameDayCandidate {
                    merchant_key: merchant_key.clone(),
                    day_of_month,
                    cluster,
                });
            }
        }
    }
    candidates
}

fn qualifies(cluster: &AmountCluster) -> bool {
    if cluster.rows.len() >= 3 {
        return true;
    }
    let mut months = cluster
        .rows
        .iter()
        .map(|row| (row.date.year(), row.date.month()))
        .collect::<Vec<(i32, u32)>>();
    months.sort_unstable();
    months.dedup();
    cluster.rows.len() >= 2 && months.len() >= 2
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::detection::policy::DETECTION_POLICY_LIVE;
    use crate::types::{Transaction, TransactionKind};

    use super::detect_same_day_candidates;

    fn row(date: &str, amount: f64, merchant: &str) -> Transaction {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d");
        assert!(parsed.is_ok());
        Transaction {
            id: format!("txn_{merchant}_{date}"),
            amount,
            description: "CARD PAYMENT".to_string(),
            date: parsed.unwrap_or(NaiveDate::MIN),
            merchant: merchant.to_string(),
            category: None,
            account_id: "acct_1".to_string(),
            bank_name: None,
            kind: TransactionKind::Debit,
        }
    }

    #[test]
    fn two_charges_on_the_same_day_across_months_qualify() {
        let transactions = vec![
            row("2026-04-12", -14.99, "ICLOUD"),
            row("2026-05-12", -14.99, "ICLOUD"),
        ];
        let candidates = detect_same_day_candidates(&transactions, &DETECTION_POLICY_LIVE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].day_of_month, 12);
        assert_eq!(candidates[0].merchant_key, "icloud");
    }

    #[test]
    fn two_charges_inside_one_month_do_not_qualify() {
        let transactions = vec![
            row("2026-04-12", -14.99, "ICLOUD"),
            row("2026-04-12", -14.99, "ICLOUD"),
        ];
        let candidates = detect_same_day_candidates(&transactions, &DETECTION_POLICY_LIVE);
        assert!(candidates.is_empty());
    }

    #[test]
    fn three_charges_qualify_regardless_of_span() {
        let transactions = vec![
            row("2026-04-03", -7.99, "STREAMCO"),
            row("2026-04-03", -7.99, "STREAMCO"),
            row("2026-04-03", -7.99, "STREAMCO"),
        ];
        let candidates = detect_same_day_candidates(&transactions, &DETECTION_POLICY_LIVE);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn wide_amount_spread_splits_the_group_apart() {
        let transactions = vec![
            row("2026-04-12", -14.99, "ICLOUD"),
            row("2026-05-12", -44.99, "ICLOUD"),
        ];
        let candidates = detect_same_day_candidates(&transactions, &DETECTION_POLICY_LIVE);
        assert!(candidates.is_empty());
    }

    #[test]
    fn credits_are_ignored() {
        let mut refund = row("2026-05-12", 14.99, "ICLOUD");
        refund.kind = TransactionKind::Credit;
        let transactions = vec![row("2026-04-12", -14.99, "ICLOUD"), refund];
        let candidates = detect_same_day_candidates(&transactions, &DETECTION_POLICY_LIVE);
        assert!(candidates.is_empty());
    }
}
