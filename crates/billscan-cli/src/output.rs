use serde_json::json;

use billscan_engine::{DetectedBill, ENGINE_VERSION, QuickAssessment};

pub fn render_bills_text(bills: &[DetectedBill], skipped_rows: usize, excluded: usize) -> String {
    let mut lines = Vec::new();
    if bills.is_empty() {
        lines.push("No recurring bills detected.".to_string());
    } else {
        lines.push(format!(
            "{:<32} {:>10} {:<10} {:<14} {:>6} {:<10} NEXT DUE",
            "BILL", "AMOUNT", "CADENCE", "CATEGORY", "CONF", "STATUS"
        ));
        for bill in bills {
            lines.push(format!(
                "{:<32} {:>10.2} {:<10} {:<14} {:>6.2} {:<10} {}",
                bill.name,
                bill.amount,
                bill.frequency.as_str(),
                bill.category,
                bill.confidence,
                bill.status.as_str(),
                bill.next_due_date.format("%Y-%m-%d"),
            ));
        }
    }
    lines.push(format!(
        "{} bill(s); {} row(s) skipped; {} excluded by preferences",
        bills.len(),
        skipped_rows,
        excluded
    ));
    lines.join("\n")
}

pub fn render_bills_json(
    bills: &[DetectedBill],
    skipped_rows: usize,
    excluded: usize,
) -> Result<String, String> {
    let envelope = json!({
        "ok": true,
        "version": ENGINE_VERSION,
        "data": {
            "bills": bills,
            "skipped_rows": skipped_rows,
            "excluded_by_preferences": excluded,
        },
    });
    serde_json::to_string_pretty(&envelope).map_err(|error| error.to_string())
}

pub fn render_quick_text(verdict: &QuickAssessment) -> String {
    format!(
        "likely bill: {} (category {}, confidence {:.2})",
        if verdict.is_bill { "yes" } else { "no" },
        verdict.category,
        verdict.confidence
    )
}

pub fn render_quick_json(verdict: &QuickAssessment) -> Result<String, String> {
    let envelope = json!({
        "ok": true,
        "version": ENGINE_VERSION,
        "data": {
            "is_bill": verdict.is_bill,
            "category": verdict.category,
            "confidence": verdict.confidence,
        },
    });
    serde_json::to_string_pretty(&envelope).map_err(|error| error.to_string())
}
