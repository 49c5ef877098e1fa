use std::fs;
use std::path::Path;

use serde::Deserialize;

use billscan_engine::detection::normalize::normalize_merchant;
use billscan_engine::{DetectedBill, Transaction, TransactionKind};

use crate::cli::parse_iso_date;

/// One row of the normalized transaction schema, dates and kinds still raw.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: String,
    pub merchant: String,
    #[serde(default)]
    pub category: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub bank_name: Option<String>,
    pub kind: String,
}

#[derive(Debug)]
pub struct LoadedTransactions {
    pub transactions: Vec<Transaction>,
    /// Rows dropped for unparseable dates or unknown kinds.
    pub skipped_rows: usize,
}

/// Caller-side exclusion tuple; the engine itself never sees these.
#[derive(Debug, Clone, Deserialize)]
pub struct Exclusion {
    pub merchant: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Load a JSON array or CSV of transactions.
///
/// Malformed individual rows are skipped and counted, not fatal: the
/// pipeline downstream assumes every date it sees is valid.
pub fn load_transactions(path: &Path) -> Result<LoadedTransactions, String> {
    let content = fs::read_to_string(path)
        .map_err(|error| format!("cannot read `{}`: {error}", path.display()))?;

    let records = if content.trim_start().starts_with('[') {
        parse_json_records(&content)?
    } else {
        parse_csv_records(&content)?
    };

    let mut transactions = Vec::with_capacity(records.len());
    let mut skipped_rows = 0usize;
    for record in records {
        match validate_record(record) {
            Some(transaction) => transactions.push(transaction),
            None => skipped_rows += 1,
        }
    }

    Ok(LoadedTransactions {
        transactions,
        skipped_rows,
    })
}

pub fn load_exclusions(path: &Path) -> Result<Vec<Exclusion>, String> {
    let content = fs::read_to_string(path)
        .map_err(|error| format!("cannot read `{}`: {error}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|error| format!("invalid exclusion file `{}`: {error}", path.display()))
}

/// Drop bills the user has excluded. Merchant matching uses the same
/// normalization as detection grouping; amount and category narrow the match
/// when present.
pub fn apply_exclusions(bills: Vec<DetectedBill>, exclusions: &[Exclusion]) -> Vec<DetectedBill> {
    bills
        .into_iter()
        .filter(|bill| !exclusions.iter().any(|exclusion| excludes(exclusion, bill)))
        .collect()
}

fn excludes(exclusion: &Exclusion, bill: &DetectedBill) -> bool {
    let Some(merchant_key) = normalize_merchant(&exclusion.merchant) else {
        return false;
    };
    if merchant_key != bill.merchant {
        return false;
    }
    if let Some(amount) = exclusion.amount
        && (amount - bill.amount).abs() > 0.01
    {
        return false;
    }
    if let Some(category) = &exclusion.category
        && category != &bill.category
    {
        return false;
    }
    true
}

fn parse_json_records(content: &str) -> Result<Vec<TransactionRecord>, String> {
    serde_json::from_str(content).map_err(|error| format!("invalid JSON transaction array: {error}"))
}

fn parse_csv_records(content: &str) -> Result<Vec<TransactionRecord>, String> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize::<TransactionRecord>() {
        let record = row.map_err(|error| format!("invalid CSV row: {error}"))?;
        records.push(record);
    }
    Ok(records)
}

fn validate_record(record: TransactionRecord) -> Option<Transaction> {
    let date = parse_iso_date(&record.date).ok()?;
    let kind = match record.kind.to_ascii_lowercase().as_str() {
        "debit" => TransactionKind::Debit,
        "credit" => TransactionKind::Credit,
        _ => return None,
    };
    Some(Transaction {
        id: record.id,
        amount: record.amount,
        description: record.description,
        date,
        merchant: record.merchant,
        category: record.category,
        account_id: record.account_id,
        bank_name: record.bank_name,
        kind,
    })
}
