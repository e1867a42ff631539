//! Access Code Manager
//!
//! Owns the `codes` collection and its state machine:
//! - issuance of fresh single-use tokens
//! - case-normalized lookup and validation
//! - the one irreversible redemption transition
//! - dispatch-result recording and delivery-status reconciliation
//!
//! Every mutation follows read-collection, modify, write-collection-back
//! with no await between the read and the write; reconciliation gathers its
//! probe verdicts first and applies them in one synchronous pass.

use crate::error::CoreError;
use crate::types::{AccessCode, DeliveryStatus, ReviewStatus};
use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use ratify_gateway::{DeliveryProbe, DeliveryVerdict, DispatchReceipt};
use ratify_store::{Collection, KeyValueStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Collection key for access codes (legacy persisted layout)
pub const CODES_KEY: &str = "pharma_codes";

/// Length of a generated invite token
const TOKEN_LEN: usize = 6;

/// Result of validating a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeValidation {
    /// Whether a record exists for the token
    pub valid: bool,
    /// Whether the record was already consumed
    pub used: bool,
}

/// Outcome of handing one invite to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Network layer accepted the request
    Accepted {
        /// Provisional correlation id from the transport
        provider_message_id: String,
    },
    /// Transport rejected the request; terminal for this invite
    Failed {
        /// Human-readable reason, surfaced to the admin
        reason: String,
    },
}

impl From<&DispatchReceipt> for DispatchOutcome {
    fn from(receipt: &DispatchReceipt) -> Self {
        Self::Accepted {
            provider_message_id: receipt.provider_message_id.clone(),
        }
    }
}

/// Report from one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// In-flight codes probed this pass
    pub checked: usize,
    /// Codes confirmed delivered
    pub delivered: usize,
    /// Codes that received a failure verdict
    pub failed: usize,
    /// Codes still awaiting a terminal verdict
    pub still_in_flight: usize,
    /// Probe attempts that errored (retried next pass)
    pub errors: usize,
}

/// Issues, queries and reconciles single-use access codes
#[derive(Debug, Clone)]
pub struct AccessCodeManager {
    codes: Collection<AccessCode>,
}

impl AccessCodeManager {
    /// Create a manager over the given backend
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            codes: Collection::new(store, CODES_KEY),
        }
    }

    /// Issue a fresh code for `phone_number`
    ///
    /// The token is 6 uppercase alphanumeric characters, checked against the
    /// existing collection and regenerated on collision. The number is
    /// stored exactly as entered.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn create_code(&self, phone_number: &str) -> Result<AccessCode, CoreError> {
        let mut codes = self.codes.load()?;

        let mut token = generate_token();
        while codes.iter().any(|c| c.code == token) {
            token = generate_token();
        }

        let record = AccessCode {
            code: token,
            phone_number: phone_number.to_string(),
            review_status: ReviewStatus::Pending,
            delivery_status: DeliveryStatus::Queued,
            provider_message_id: None,
            created_at: Utc::now(),
            last_checked_at: None,
        };
        codes.push(record.clone());
        self.codes.save(&codes)?;

        debug!(code = %record.code, "issued access code");
        Ok(record)
    }

    /// All codes, most recently created first
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn list_codes(&self) -> Result<Vec<AccessCode>, CoreError> {
        let mut codes = self.codes.load()?;
        codes.reverse();
        Ok(codes)
    }

    /// Remove a code entirely; unknown tokens are a no-op
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn delete_code(&self, code: &str) -> Result<(), CoreError> {
        let token = canonical(code);
        let mut codes = self.codes.load()?;
        codes.retain(|c| c.code != token);
        self.codes.save(&codes)?;
        Ok(())
    }

    /// Look up a single code by token
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn get_code(&self, code: &str) -> Result<Option<AccessCode>, CoreError> {
        let token = canonical(code);
        let codes = self.codes.load()?;
        Ok(codes.into_iter().find(|c| c.code == token))
    }

    /// Check whether a token exists and whether it was already consumed
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn validate_code(&self, code: &str) -> Result<CodeValidation, CoreError> {
        let token = canonical(code);
        let codes = self.codes.load()?;
        Ok(match codes.iter().find(|c| c.code == token) {
            None => CodeValidation {
                valid: false,
                used: false,
            },
            Some(found) => CodeValidation {
                valid: true,
                used: found.review_status == ReviewStatus::Completed,
            },
        })
    }

    /// Consume a code: `Pending` -> `Completed`
    ///
    /// Idempotent; redeeming an already-completed or unknown code is a
    /// no-op. The transition is never reversed.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn mark_redeemed(&self, code: &str) -> Result<(), CoreError> {
        let token = canonical(code);
        let mut codes = self.codes.load()?;
        if let Some(found) = codes.iter_mut().find(|c| c.code == token) {
            if found.review_status == ReviewStatus::Pending {
                found.review_status = ReviewStatus::Completed;
                self.codes.save(&codes)?;
            }
        }
        Ok(())
    }

    /// Record the transport's verdict for a freshly dispatched invite
    ///
    /// Acceptance moves the code to `Sent` and stores the provider id;
    /// rejection moves it to `Failed` with no provider id. Dispatch failure
    /// is terminal for this invite; the admin issues a new one instead.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn record_dispatch_result(
        &self,
        code: &str,
        outcome: &DispatchOutcome,
    ) -> Result<(), CoreError> {
        let token = canonical(code);
        let mut codes = self.codes.load()?;
        let Some(found) = codes.iter_mut().find(|c| c.code == token) else {
            warn!(code = %token, "dispatch result for unknown code dropped");
            return Ok(());
        };

        let next = match outcome {
            DispatchOutcome::Accepted { .. } => DeliveryStatus::Sent,
            DispatchOutcome::Failed { .. } => DeliveryStatus::Failed,
        };
        if !found.delivery_status.can_transition_to(next) {
            warn!(
                code = %token,
                from = ?found.delivery_status,
                to = ?next,
                "dropping illegal delivery transition"
            );
            return Ok(());
        }

        match outcome {
            DispatchOutcome::Accepted {
                provider_message_id,
            } => {
                found.delivery_status = DeliveryStatus::Sent;
                found.provider_message_id = Some(provider_message_id.clone());
            }
            DispatchOutcome::Failed { reason } => {
                found.delivery_status = DeliveryStatus::Failed;
                warn!(code = %token, reason = %reason, "invite dispatch failed");
            }
        }
        self.codes.save(&codes)?;
        Ok(())
    }

    /// Probe every in-flight (`Sent`) code and write back terminal verdicts
    ///
    /// Probe errors are isolated per code: logged, counted, retried on the
    /// next pass, and never turned into a `Failed` status. Terminal and
    /// `Queued` codes are skipped entirely. The operation reads current
    /// status and writes final status, so overlapping passes are safe.
    ///
    /// # Errors
    /// Propagates store failures; per-code probe errors never abort the batch.
    pub async fn reconcile_delivery_statuses(
        &self,
        probe: &dyn DeliveryProbe,
    ) -> Result<ReconcileReport, CoreError> {
        let snapshot = self.codes.load()?;
        let in_flight: Vec<(String, String)> = snapshot
            .iter()
            .filter(|c| c.delivery_status == DeliveryStatus::Sent)
            .filter_map(|c| {
                c.provider_message_id
                    .as_ref()
                    .map(|id| (c.code.clone(), id.clone()))
            })
            .collect();

        let mut report = ReconcileReport::default();
        if in_flight.is_empty() {
            return Ok(report);
        }

        // Gather verdicts first; the store write below stays await-free.
        let mut verdicts: Vec<(String, DeliveryVerdict)> = Vec::with_capacity(in_flight.len());
        for (code, message_id) in &in_flight {
            report.checked += 1;
            match probe.check(message_id).await {
                Ok(verdict) => verdicts.push((code.clone(), verdict)),
                Err(e) => {
                    report.errors += 1;
                    warn!(code = %code, error = %e, "delivery probe failed; will retry next pass");
                }
            }
        }

        let now = Utc::now();
        let mut codes = self.codes.load()?;
        for (code, verdict) in verdicts {
            let Some(found) = codes.iter_mut().find(|c| c.code == code) else {
                // Deleted between snapshot and write-back; the lost update
                // is acceptable.
                continue;
            };
            if found.delivery_status.is_terminal() {
                continue;
            }
            found.last_checked_at = Some(now);
            match verdict {
                DeliveryVerdict::Delivered
                    if found
                        .delivery_status
                        .can_transition_to(DeliveryStatus::Delivered) =>
                {
                    found.delivery_status = DeliveryStatus::Delivered;
                    report.delivered += 1;
                }
                DeliveryVerdict::Failed
                    if found
                        .delivery_status
                        .can_transition_to(DeliveryStatus::Failed) =>
                {
                    found.delivery_status = DeliveryStatus::Failed;
                    report.failed += 1;
                }
                _ => {
                    report.still_in_flight += 1;
                }
            }
        }
        self.codes.save(&codes)?;

        debug!(?report, "reconciliation pass complete");
        Ok(report)
    }
}

/// Canonical form of a token: trimmed and uppercased
///
/// Tokens are generated uppercase and every lookup uppercases its argument,
/// so a case-mangled SMS link still resolves.
#[must_use]
pub fn canonical(code: &str) -> String {
    code.trim().to_uppercase()
}

fn generate_token() -> String {
    Alphanumeric
        .sample_string(&mut rand::rng(), TOKEN_LEN)
        .to_uppercase()
}
