//! Error types for the core
//!
//! Validation and submission errors are typed results handed back to the
//! caller, never panics. Probe failures during reconciliation are not
//! represented here at all: they are isolated per code, logged, and
//! surfaced only as counts in the reconcile report.

use ratify_store::StoreError;

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No record exists for the given token ("invalid link")
    #[error("access code not found")]
    CodeNotFound,

    /// The token exists but was already consumed ("already submitted")
    #[error("access code already redeemed")]
    CodeAlreadyRedeemed,

    /// A rating sub-score is missing or outside 1-5
    #[error("incomplete submission: {field} must be between 1 and 5")]
    IncompleteSubmission {
        /// Name of the offending sub-score
        field: &'static str,
    },

    /// The transport adapter reported a dispatch failure
    #[error("sms dispatch failed: {0}")]
    DispatchFailure(String),

    /// Persistence failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Whether this error is a user-facing rejection rather than a fault
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::CodeNotFound | Self::CodeAlreadyRedeemed | Self::IncompleteSubmission { .. }
        )
    }
}
