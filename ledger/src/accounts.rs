//! The points ledger: registration, balance mutation, and the block list.

use crate::LedgerError;
use eligo_store::{StoreError, UserRecord, UserStore};
use eligo_types::{BonusParams, Timestamp, UserId};
use std::sync::Arc;

/// Ledger service over a [`UserStore`].
///
/// Atomicity is the store's contract; this layer adds the registration and
/// referral flow and the bonus schedule.
#[derive(Clone)]
pub struct PointsLedger {
    store: Arc<dyn UserStore>,
    bonuses: BonusParams,
}

impl PointsLedger {
    pub fn new(store: Arc<dyn UserStore>, bonuses: BonusParams) -> Self {
        Self { store, bonuses }
    }

    pub fn bonuses(&self) -> &BonusParams {
        &self.bonuses
    }

    /// Register a new user with the registration bonus as the opening
    /// balance. Returns `false` if the id is already registered.
    ///
    /// When `invited_by` names an existing, non-blocked user, the inviter
    /// is credited the referral bonus as an atomic follow-up. The referral
    /// credit is best-effort: its failure is logged and never rolls back
    /// the registration.
    pub fn register(
        &self,
        id: UserId,
        username: &str,
        display_name: &str,
        invited_by: Option<UserId>,
        now: Timestamp,
    ) -> Result<bool, LedgerError> {
        let inviter = match invited_by {
            Some(candidate) => self.resolve_inviter(candidate)?,
            None => None,
        };

        let record = UserRecord {
            id,
            username: username.to_string(),
            display_name: display_name.to_string(),
            balance: self.bonuses.registration,
            blocked: false,
            invited_by: inviter,
            registered_at: now,
        };
        if !self.store.create_user(&record)? {
            return Ok(false);
        }
        tracing::info!(user = %id, invited = inviter.is_some(), "user registered");

        if let Some(inviter) = inviter {
            match self.store.credit(inviter, self.bonuses.referral) {
                Ok(true) => {
                    tracing::info!(user = %inviter, bonus = self.bonuses.referral, "referral bonus credited");
                }
                Ok(false) => {
                    tracing::warn!(user = %inviter, "referral bonus skipped: inviter vanished");
                }
                Err(e) => {
                    tracing::warn!(user = %inviter, "referral bonus failed: {e}");
                }
            }
        }
        Ok(true)
    }

    /// An inviter only counts if it resolves to a registered, non-blocked
    /// user; anything else (junk payloads included) is silently dropped.
    fn resolve_inviter(&self, candidate: UserId) -> Result<Option<UserId>, LedgerError> {
        if !self.store.exists(candidate)? {
            return Ok(None);
        }
        if self.store.get_user(candidate)?.blocked {
            return Ok(None);
        }
        Ok(Some(candidate))
    }

    /// Add points to a user's balance. Returns `false` for an unknown user.
    pub fn credit(&self, id: UserId, amount: u64) -> Result<bool, LedgerError> {
        Ok(self.store.credit(id, amount)?)
    }

    /// Conditionally remove points. Returns `false` when the balance is
    /// short; the store guarantees the check and decrement are one atomic
    /// step.
    pub fn debit(&self, id: UserId, amount: u64) -> Result<bool, LedgerError> {
        Ok(self.store.debit(id, amount)?)
    }

    pub fn set_blocked(&self, id: UserId, blocked: bool) -> Result<bool, LedgerError> {
        Ok(self.store.set_blocked(id, blocked)?)
    }

    pub fn exists(&self, id: UserId) -> Result<bool, LedgerError> {
        Ok(self.store.exists(id)?)
    }

    pub fn get(&self, id: UserId) -> Result<UserRecord, LedgerError> {
        match self.store.get_user(id) {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(_)) => Err(LedgerError::UnknownUser(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Unregistered users are simply "not blocked".
    pub fn is_blocked(&self, id: UserId) -> Result<bool, LedgerError> {
        if !self.store.exists(id)? {
            return Ok(false);
        }
        Ok(self.store.get_user(id)?.blocked)
    }

    pub fn list_blocked(&self) -> Result<Vec<UserRecord>, LedgerError> {
        Ok(self.store.list_blocked()?)
    }

    pub fn list_all_ids(&self) -> Result<Vec<UserId>, LedgerError> {
        Ok(self.store.list_user_ids()?)
    }
}
