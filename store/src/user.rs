//! User registry and point balance storage trait.

use crate::StoreError;
use eligo_types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Per-user record owned by the ledger store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    /// Current point balance. Never negative: the only decrement path is
    /// the conditional [`UserStore::debit`].
    pub balance: u64,
    pub blocked: bool,
    /// Set once at registration, never mutated afterwards.
    pub invited_by: Option<UserId>,
    pub registered_at: Timestamp,
}

/// Trait for user registry and balance operations.
///
/// Every mutation of a single user's record is atomic and serialized with
/// respect to other mutations of the same user; operations on different
/// users may proceed concurrently.
pub trait UserStore: Send + Sync {
    /// Insert a new user record. Returns `false` without mutation if the
    /// user id is already registered.
    fn create_user(&self, record: &UserRecord) -> Result<bool, StoreError>;

    fn get_user(&self, id: UserId) -> Result<UserRecord, StoreError>;

    fn exists(&self, id: UserId) -> Result<bool, StoreError>;

    /// Add points to a balance. Returns `false` only for an unknown user.
    fn credit(&self, id: UserId, amount: u64) -> Result<bool, StoreError>;

    /// Conditionally remove points from a balance.
    ///
    /// This is a single atomic test-and-decrement: it returns `false`
    /// without mutation when the balance is below `amount`, and concurrent
    /// debits can never drive the balance negative. It must not be layered
    /// on a separate read followed by a write.
    fn debit(&self, id: UserId, amount: u64) -> Result<bool, StoreError>;

    /// Set or clear the blocked flag. Returns `false` for an unknown user.
    fn set_blocked(&self, id: UserId, blocked: bool) -> Result<bool, StoreError>;

    fn list_blocked(&self) -> Result<Vec<UserRecord>, StoreError>;

    fn list_user_ids(&self) -> Result<Vec<UserId>, StoreError>;

    fn user_count(&self) -> Result<u64, StoreError> {
        self.list_user_ids().map(|ids| ids.len() as u64)
    }
}
