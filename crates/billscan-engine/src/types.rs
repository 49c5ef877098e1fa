use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Debit,
    Credit,
}

impl TransactionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

/// One bank-statement row as supplied by the transaction store.
///
/// Amounts are signed as they appear on the statement; the engine only ever
/// reasons about `abs_amount` once debits have been filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub merchant: String,
    pub category: Option<String>,
    pub account_id: String,
    pub bank_name: Option<String>,
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_debit(&self) -> bool {
        self.kind == TransactionKind::Debit
    }

    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl BillFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    pub const fn expected_interval_days(self) -> i64 {
        match self {
            Self::Weekly => 7,
            Self::Monthly => 30,
            Self::Quarterly => 90,
            Self::Yearly => 365,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Active,
    Irregular,
    Cancelled,
}

impl BillStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Irregular => "irregular",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A recurring bill inferred from transaction history.
///
/// Bills have no lifecycle of their own: every run recomputes them from the
/// transaction source of truth, and `id` is a composite key
/// (`merchant|frequency` or `merchant|day<N>`) so repeated runs over the same
/// input produce the same identifiers.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedBill {
    pub id: String,
    pub name: String,
    pub merchant: String,
    pub amount: f64,
    pub frequency: BillFrequency,
    pub category: String,
    pub next_due_date: NaiveDate,
    pub last_payment_date: NaiveDate,
    pub account_id: String,
    pub bank_name: Option<String>,
    pub confidence: f64,
    pub evidence: Vec<Transaction>,
    pub status: BillStatus,
    pub average_amount: f64,
    pub day_of_month: Option<u32>,
    /// ISO weekday, 1 = Monday.
    pub day_of_week: Option<u32>,
}
