use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::detection::classify::classify_merchant;
use crate::detection::cluster::cluster_by_amount;
use crate::detection::frequency::{FrequencyPattern, detect_frequency};
use crate::detection::normalize::normalize_merchant;
use crate::detection::policy::{DETECTION_POLICY_LIVE, DetectionPolicy};
use crate::detection::sameday::detect_same_day_candidates;
use crate::detection::synthesize::{BillKey, round_to, synthesize_bill};
use crate::types::{BillFrequency, DetectedBill, Transaction};

struct Candidate {
    bill: DetectedBill,
    min_acceptance: f64,
}

/// Run the full detection pipeline against local "today".
pub fn detect_bills(transactions: &[Transaction]) -> Vec<DetectedBill> {
    detect_bills_on(transactions, Local::now().date_naive())
}

/// Run the full detection pipeline against an explicit "today".
pub fn detect_bills_on(transactions: &[Transaction], today: NaiveDate) -> Vec<DetectedBill> {
    detect_bills_with_policy(transactions, today, &DETECTION_POLICY_LIVE)
}

/// The Detection Orchestrator.
///
/// Pure function of its inputs: debits only, retail merchants dropped,
/// remaining rows grouped by normalized merchant, amount-clustered at the
/// classification's tolerance, cadence-detected, synthesized, then unioned
/// with the independent same-calendar-day pass. Candidates below their
/// merchant classification's acceptance floor are soft-filtered, never
/// errored. Output is sorted by confidence descending with ties keeping
/// their prior relative order.
pub fn detect_bills_with_policy(
    transactions: &[Transaction],
    today: NaiveDate,
    policy: &DetectionPolicy,
) -> Vec<DetectedBill> {
    let mut eligible: Vec<Transaction> = Vec::new();
    for transaction in transactions {
        if !transaction.is_debit() {
            continue;
        }
        let classification = classify_merchant(&transaction.merchant, &transaction.description);
        if classification.should_exclude_from_bills() {
            continue;
        }
        eligible.push(transaction.clone());
    }

    let mut groups: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for transaction in &eligible {
        let Some(merchant_key) = normalize_merchant(&transaction.merchant) else {
            continue;
        };
        groups.entry(merchant_key).or_default().push(transaction.clone());
    }
    debug!(
        transactions = transactions.len(),
        eligible = eligible.len(),
        merchants = groups.len(),
        "grouped transactions for detection"
    );

    let mut candidates: Vec<Candidate> = Vec::new();
    for (merchant_key, rows) in &groups {
        let classification = classify_merchant(&rows[0].merchant, &rows[0].description);
        for cluster in cluster_by_amount(rows, classification.amount_tolerance, policy.min_occurrences)
        {
            let Some(pattern) = detect_frequency(&cluster.rows, policy) else {
                continue;
            };
            match synthesize_bill(merchant_key, &cluster, &pattern, BillKey::Cadence, today, policy)
            {
                Ok(bill) => candidates.push(Candidate {
                    bill,
                    min_acceptance: classification.min_acceptance,
                }),
                Err(error) => {
                    warn!(merchant = merchant_key.as_str(), %error, "dropping bill candidate");
                }
            }
        }
    }

    let cadence_merchants: BTreeSet<String> = candidates
        .iter()
        .map(|candidate| candidate.bill.merchant.clone())
        .collect();

    for same_day in detect_same_day_candidates(&eligible, policy) {
        if cadence_merchants.contains(&same_day.merchant_key) {
            continue;
        }
        let sample = &same_day.cluster.rows[0];
        let classification = classify_merchant(&sample.merchant, &sample.description);
        let pattern = FrequencyPattern {
            frequency: BillFrequency::Monthly,
            confidence: policy.sameday_confidence,
            day_of_month: Some(same_day.day_of_month),
            day_of_week: None,
        };
        match synthesize_bill(
            &same_day.merchant_key,
            &same_day.cluster,
            &pattern,
            BillKey::CalendarDay(same_day.day_of_month),
            today,
            policy,
        ) {
            Ok(mut bill) => {
                bill.confidence = round_to(policy.sameday_confidence, 4);
                candidates.push(Candidate {
                    bill,
                    min_acceptance: classification.min_acceptance,
                });
            }
            Err(error) => {
                warn!(
                    merchant = same_day.merchant_key.as_str(),
                    %error,
                    "dropping same-day candidate"
                );
            }
        }
    }

    let mut accepted: Vec<DetectedBill> = candidates
        .into_iter()
        .filter(|candidate| candidate.bill.confidence >= candidate.min_acceptance)
        .map(|candidate| candidate.bill)
        .collect();

    accepted.sort_by(|left, right| right.confidence.total_cmp(&left.confidence));

    let mut seen_ids: BTreeSet<String> = BTreeSet::new();
    accepted.retain(|bill| seen_ids.insert(bill.id.clone()));

    debug!(bills = accepted.len(), "detection pass complete");
    accepted
}
