use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info};

use crate::detection::detect::detect_bills_with_policy;
use crate::detection::policy::{DETECTION_POLICY_LIVE, DetectionPolicy};
use crate::detection::quick::{QuickAssessment, is_likely_bill_payment_with_policy};
use crate::error::EngineResult;
use crate::types::{DetectedBill, Transaction};

/// Upstream source of transaction history. The engine never fetches on its
/// own; retries and backoff around this call belong to the implementor.
pub trait TransactionStore {
    /// Up to `limit` most-recent transactions, newest-first recommended but
    /// not required.
    fn recent_transactions(&self, limit: usize) -> EngineResult<Vec<Transaction>>;
}

/// Cooldown wrapper around the detection pipeline.
///
/// A non-forced trigger within the cooldown window of the last successful
/// run returns an empty result without fetching or recomputing. The last-run
/// instant lives behind a mutex held across the whole check-and-run, so
/// concurrent callers on one scheduler serialize instead of racing the gate.
/// Construct one per process and share it by reference; this is deliberately
/// not a global.
pub struct DetectionScheduler<S> {
    store: S,
    policy: DetectionPolicy,
    last_run: Mutex<Option<Instant>>,
}

impl<S: TransactionStore> DetectionScheduler<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, DETECTION_POLICY_LIVE)
    }

    pub fn with_policy(store: S, policy: DetectionPolicy) -> Self {
        Self {
            store,
            policy,
            last_run: Mutex::new(None),
        }
    }

    /// Run a full analysis, honoring the cooldown unless `force` is set.
    ///
    /// The last-run instant only advances on success; a failed fetch leaves
    /// the gate open for an immediate retry.
    pub fn trigger_bill_detection(&self, force: bool) -> EngineResult<Vec<DetectedBill>> {
        let mut last_run = self
            .last_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !force
            && let Some(previous) = *last_run
            && previous.elapsed() < self.policy.cooldown
        {
            debug!("detection trigger inside cooldown window, returning empty result");
            return Ok(Vec::new());
        }

        let transactions = self.store.recent_transactions(self.policy.fetch_limit)?;
        let bills =
            detect_bills_with_policy(&transactions, Local::now().date_naive(), &self.policy);
        *last_run = Some(Instant::now());
        info!(
            fetched = transactions.len(),
            bills = bills.len(),
            forced = force,
            "bill detection run complete"
        );
        Ok(bills)
    }

    /// Non-forced trigger; the usual entry point for view refreshes.
    pub fn get_current_bills(&self) -> EngineResult<Vec<DetectedBill>> {
        self.trigger_bill_detection(false)
    }

    /// Instant single-transaction verdict; no history, no cooldown.
    pub fn is_likely_bill_payment(&self, description: &str, amount: f64) -> QuickAssessment {
        is_likely_bill_payment_with_policy(description, amount, &self.policy)
    }
}
