//! Error taxonomy for the verification pipeline.
//!
//! Everything here is a *validation or infrastructure* failure. Expected
//! submission outcomes — rejection, review failure, a review outliving the
//! poll window — are not errors; they are variants of
//! [`crate::AttemptOutcome`].

use crate::status::QueryError;
use eligo_types::{ServiceType, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("user not registered: {0}")]
    UnknownUser(UserId),

    #[error("user is blocked: {0}")]
    Blocked(UserId),

    #[error("invalid verification link")]
    InvalidLink,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    /// The atomic debit lost a race against another spend.
    #[error("point deduction failed")]
    DeductionFailed,

    #[error("no verifier or parameters configured for service {0}")]
    ServiceNotConfigured(ServiceType),

    #[error("concurrency limiter unavailable")]
    LimiterClosed,

    /// Unexpected verifier failure (the cost has already been refunded).
    #[error("verifier error: {0}")]
    Verifier(String),

    #[error("no attempt recorded for verification id {0}")]
    UnknownAttempt(String),

    /// Hard failure of an on-demand status query; worth retrying.
    #[error("status query failed: {0}")]
    Query(#[from] QueryError),

    #[error("ledger error: {0}")]
    Ledger(#[from] eligo_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] eligo_store::StoreError),
}
