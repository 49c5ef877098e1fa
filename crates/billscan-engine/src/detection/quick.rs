use crate::detection::normalize::classification_haystack;
use crate::detection::policy::{DETECTION_POLICY_LIVE, DetectionPolicy};
use crate::detection::synthesize::{clamp01, round_to};

/// Instant verdict on a single new transaction with no history behind it.
///
/// Deliberately cruder than the batch pipeline; the two may disagree on the
/// same transaction and that is fine.
#[derive(Debug, Clone)]
pub struct QuickAssessment {
    pub is_bill: bool,
    pub category: String,
    pub confidence: f64,
}

const KEYWORD_HIT_SCORE: f64 = 0.3;
const ROUND_AMOUNT_SCORE: f64 = 0.2;
const PRICE_POINT_SCORE: f64 = 0.4;
const ROUND_AMOUNT_RANGE: (f64, f64) = (10.0, 500.0);

/// Curated keyword list, smaller than the classifier tables on purpose.
const QUICK_MARKERS: &[(&str, &str)] = &[
    ("netflix", "Subscriptions"),
    ("spotify", "Subscriptions"),
    ("prime", "Subscriptions"),
    ("subscription", "Subscriptions"),
    ("membership", "Subscriptions"),
    ("gym", "Subscriptions"),
    ("electric", "Utilities"),
    ("gas", "Utilities"),
    ("water", "Utilities"),
    ("energy", "Utilities"),
    ("broadband", "Utilities"),
    ("mobile", "Utilities"),
    ("council tax", "Utilities"),
    ("insurance", "Insurance"),
    ("premium", "Insurance"),
    ("rent", "Housing"),
    ("mortgage", "Housing"),
    ("loan", "Financial"),
];

/// Common subscription price points; matching one is a strong signal.
const SUBSCRIPTION_PRICE_POINTS: &[f64] = &[
    4.99, 5.99, 6.99, 7.99, 8.99, 9.99, 10.99, 11.99, 12.99, 14.99, 15.99, 17.99, 19.99, 24.99,
    25.00, 29.99, 34.99, 39.99, 49.99, 59.99, 79.99, 99.99,
];

pub fn is_likely_bill_payment(description: &str, amount: f64) -> QuickAssessment {
    is_likely_bill_payment_with_policy(description, amount, &DETECTION_POLICY_LIVE)
}

pub fn is_likely_bill_payment_with_policy(
    description: &str,
    amount: f64,
    policy: &DetectionPolicy,
) -> QuickAssessment {
    let haystack = classification_haystack(description);
    let mut confidence = 0.0;
    let mut category: Option<&str> = None;

    for (keyword, keyword_category) in QUICK_MARKERS {
        if haystack.contains(keyword) {
            confidence += KEYWORD_HIT_SCORE;
            if category.is_none() {
                category = Some(keyword_category);
            }
        }
    }
    confidence = confidence.min(1.0);

    let absolute = amount.abs();
    if is_round_amount(absolute) {
        confidence += ROUND_AMOUNT_SCORE;
    }
    if is_subscription_price_point(absolute) {
        confidence += PRICE_POINT_SCORE;
    }

    let confidence = round_to(clamp01(confidence), 4);
    QuickAssessment {
        is_bill: confidence >= policy.quick_min_confidence,
        category: category.unwrap_or("Other").to_string(),
        confidence,
    }
}

fn is_round_amount(absolute: f64) -> bool {
    let (low, high) = ROUND_AMOUNT_RANGE;
    absolute >= low && absolute <= high && (absolute - absolute.round()).abs() < 0.005
}

fn is_subscription_price_point(absolute: f64) -> bool {
    SUBSCRIPTION_PRICE_POINTS
        .iter()
        .any(|price| (absolute - price).abs() < 0.005)
}

#[cfg(test)]
mod tests {
    use super::is_likely_bill_payment;

    #[test]
    fn keyword_plus_price_point_clears_the_bar() {
        let verdict = is_likely_bill_payment("NETFLIX.COM", 9.99);
        assert!(verdict.is_bill);
        assert_eq!(verdict.category, "Subscriptions");
        assert!((verdict.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn round_amount_alone_is_not_enough() {
        let verdict = is_likely_bill_payment("CARD PURCHASE 4412", 40.0);
        assert!(!verdict.is_bill);
        assert_eq!(verdict.category, "Other");
        assert!((verdict.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn first_keyword_hit_sets_the_category() {
        let verdict = is_likely_bill_payment("GYM MEMBERSHIP INSURANCE ADDON", 55.0);
        assert!(verdict.is_bill);
        assert_eq!(verdict.category, "Subscriptions");
    }

    #[test]
    fn keyword_score_is_capped_before_amount_signals() {
        // Four keyword hits would be 1.2 uncapped; plus round amount 0.2 the
        // final confidence still clamps to 1.0.
        let verdict = is_likely_bill_payment("GAS ELECTRIC WATER BROADBAND BUNDLE", 120.0);
        assert!(verdict.is_bill);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.category, "Utilities");
    }

    #[test]
    fn signed_amounts_score_on_magnitude() {
        let verdict = is_likely_bill_payment("SPOTIFY", -11.99);
        assert!(verdict.is_bill);
        assert!((verdict.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn plain_retail_text_scores_low() {
        let verdict = is_likely_bill_payment("COFFEE SHOP 117", 3.65);
        assert!(!verdict.is_bill);
        assert_eq!(verdict.confidence, 0.0);
    }
}
