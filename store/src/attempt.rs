//! Verification attempt log storage trait.

use crate::StoreError;
use eligo_types::{ServiceType, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one logged verification attempt, assigned by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttemptId(u64);

impl AttemptId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of a verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Submitted and awaiting remote review.
    Pending,
    Success,
    Failed,
}

/// One user-initiated verification attempt, tracked from submission to
/// terminal resolution. Rows are appended and updated, never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationAttempt {
    pub id: AttemptId,
    pub user: UserId,
    pub service: ServiceType,
    pub source_url: String,
    /// Remote review identifier, assigned once the submission is accepted.
    pub external_id: Option<String>,
    pub status: AttemptStatus,
    /// Opaque audit payload from the verifier or the status endpoint.
    pub raw_result: String,
    /// Points debited when the attempt was submitted.
    pub cost_reserved: u64,
    /// Whether the reserved cost has been credited back. Set at most once,
    /// and only on the failure path.
    pub refunded: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Trait for the append-only verification attempt log.
pub trait AttemptStore: Send + Sync {
    /// Append a new attempt. The store assigns and returns the id; the
    /// `id` field of the passed record is ignored.
    fn append(&self, attempt: &VerificationAttempt) -> Result<AttemptId, StoreError>;

    /// Update an attempt's status and audit payload. Returns `false` for an
    /// unknown id.
    fn update_status(
        &self,
        id: AttemptId,
        status: AttemptStatus,
        raw_result: &str,
        now: Timestamp,
    ) -> Result<bool, StoreError>;

    /// Atomically set the refunded flag.
    ///
    /// Returns `true` only for the call that flips the flag from unset to
    /// set; every later call returns `false`. This is the guard that makes
    /// refunds exactly-once. Errors with `NotFound` for an unknown id.
    fn mark_refunded(&self, id: AttemptId, now: Timestamp) -> Result<bool, StoreError>;

    fn get(&self, id: AttemptId) -> Result<Option<VerificationAttempt>, StoreError>;

    /// Find the attempt that was assigned a remote review identifier.
    fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<VerificationAttempt>, StoreError>;

    /// A user's attempts, newest first, capped at `limit`.
    fn list_for_user(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<VerificationAttempt>, StoreError>;
}
