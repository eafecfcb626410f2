//! Daily check-in tracker.

use crate::{LedgerError, PointsLedger};
use eligo_store::CheckInStore;
use eligo_types::{Timestamp, UserId};
use std::sync::Arc;

/// Check-in service over a [`CheckInStore`] and the points ledger.
///
/// A check-in is idempotent-to-failure: the first call on a day credits the
/// bonus, every later call the same day fails without side effects.
#[derive(Clone)]
pub struct CheckIns {
    store: Arc<dyn CheckInStore>,
    ledger: PointsLedger,
}

impl CheckIns {
    pub fn new(store: Arc<dyn CheckInStore>, ledger: PointsLedger) -> Self {
        Self { store, ledger }
    }

    pub fn can_check_in(&self, user: UserId, now: Timestamp) -> Result<bool, LedgerError> {
        Ok(!self.store.contains(user, now.calendar_date())?)
    }

    /// Record today's check-in and credit the bonus. Returns `false` when
    /// the user already checked in today.
    pub fn check_in(&self, user: UserId, now: Timestamp) -> Result<bool, LedgerError> {
        if !self.ledger.exists(user)? {
            return Err(LedgerError::UnknownUser(user));
        }
        if !self.store.insert(user, now.calendar_date())? {
            return Ok(false);
        }
        let bonus = self.ledger.bonuses().check_in;
        if !self.ledger.credit(user, bonus)? {
            return Err(LedgerError::UnknownUser(user));
        }
        tracing::info!(user = %user, bonus, "daily check-in");
        Ok(true)
    }
}
