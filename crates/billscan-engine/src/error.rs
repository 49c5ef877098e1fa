use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("transaction store fetch failed: {reason}")]
    StoreUnavailable { reason: String },

    #[error(
        "next due date starting from {last_payment} did not reach the future within {limit} steps"
    )]
    DueDateUnreachable { last_payment: NaiveDate, limit: u32 },
}

impl EngineError {
    pub fn store_unavailable(reason: &str) -> Self {
        Self::StoreUnavailable {
            reason: reason.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
