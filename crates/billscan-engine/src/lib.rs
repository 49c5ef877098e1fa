pub mod detection;
pub mod error;
pub mod scheduler;
pub mod types;

pub use detection::classify::{MerchantClassification, MerchantKind, classify_merchant};
pub use detection::detect::{detect_bills, detect_bills_on, detect_bills_with_policy};
pub use detection::policy::{
    DETECTION_POLICY_HISTORICAL, DETECTION_POLICY_LIVE, DetectionPolicy,
};
pub use detection::quick::{QuickAssessment, is_likely_bill_payment};
pub use error::{EngineError, EngineResult};
pub use scheduler::{DetectionScheduler, TransactionStore};
pub use types::{BillFrequency, BillStatus, DetectedBill, Transaction, TransactionKind};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
