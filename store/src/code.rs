//! Redemption code storage trait.

use crate::StoreError;
use eligo_types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A shared token crediting points to the first `max_uses` distinct users
/// who redeem it before expiry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RedemptionCode {
    pub code: String,
    pub point_value: u64,
    pub max_uses: u32,
    pub current_uses: u32,
    pub expires_at: Option<Timestamp>,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl RedemptionCode {
    /// Whether the code has expired as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Whether every use has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.current_uses >= self.max_uses
    }
}

/// Result of attempting to consume one use of a code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// No code with this key exists.
    NotFound,
    /// Every use has already been consumed.
    Exhausted,
    /// The code's expiry has passed.
    Expired,
    /// This user already holds a redemption record for the code.
    AlreadyUsed,
    /// One use consumed and the (code, user) record written; the carried
    /// value is the point amount the caller must now credit.
    Consumed(u64),
}

/// Trait for redemption code storage.
pub trait CodeStore: Send + Sync {
    /// Insert a new code. Returns `false` without mutation if the key is
    /// already taken.
    fn insert_code(&self, code: &RedemptionCode) -> Result<bool, StoreError>;

    fn get_code(&self, code: &str) -> Result<Option<RedemptionCode>, StoreError>;

    /// Atomically validate and consume one use of a code for a user.
    ///
    /// On `Consumed` the use counter increment and the (code, user) record
    /// insertion commit together; no interleaved call can observe one
    /// without the other, and `current_uses` never exceeds `max_uses`.
    fn consume(
        &self,
        code: &str,
        user: UserId,
        now: Timestamp,
    ) -> Result<ConsumeOutcome, StoreError>;

    /// Codes in creation order, newest first, capped at `limit`.
    fn list_codes(&self, limit: usize) -> Result<Vec<RedemptionCode>, StoreError>;

    fn code_count(&self) -> Result<u64, StoreError>;
}
