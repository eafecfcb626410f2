//! Redemption codes: creation, consumption, and listing.

use crate::{LedgerError, PointsLedger};
use eligo_store::{CodeStore, ConsumeOutcome, RedemptionCode};
use eligo_types::{Timestamp, UserId};
use std::sync::Arc;

/// Result of a redemption, as surfaced to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedeemOutcome {
    NotFound,
    Exhausted,
    Expired,
    AlreadyUsed,
    /// The code was consumed and the user's balance credited this amount.
    Credited(u64),
}

/// Redemption code service over a [`CodeStore`] and the points ledger.
#[derive(Clone)]
pub struct RedemptionCodes {
    store: Arc<dyn CodeStore>,
    ledger: PointsLedger,
}

impl RedemptionCodes {
    pub fn new(store: Arc<dyn CodeStore>, ledger: PointsLedger) -> Self {
        Self { store, ledger }
    }

    /// Create a new code. Returns `false` if the key is already taken or a
    /// bound is non-positive.
    pub fn create_code(
        &self,
        code: &str,
        point_value: u64,
        created_by: UserId,
        max_uses: u32,
        expire_in_days: Option<u64>,
        now: Timestamp,
    ) -> Result<bool, LedgerError> {
        if code.is_empty() || point_value == 0 || max_uses == 0 {
            return Ok(false);
        }
        let record = RedemptionCode {
            code: code.to_string(),
            point_value,
            max_uses,
            current_uses: 0,
            expires_at: expire_in_days.map(|days| now.plus_days(days)),
            created_by,
            created_at: now,
        };
        let created = self.store.insert_code(&record)?;
        if created {
            tracing::info!(code, point_value, max_uses, "redemption code created");
        }
        Ok(created)
    }

    /// Redeem one use of a code for a user.
    ///
    /// The store consumes the use and writes the (code, user) record as one
    /// atomic unit; the balance credit follows. The credit cannot fail for
    /// a registered user because accounts are never deleted, so no partial
    /// redemption is observable.
    pub fn redeem(
        &self,
        code: &str,
        user: UserId,
        now: Timestamp,
    ) -> Result<RedeemOutcome, LedgerError> {
        if !self.ledger.exists(user)? {
            return Err(LedgerError::UnknownUser(user));
        }

        let outcome = match self.store.consume(code, user, now)? {
            ConsumeOutcome::NotFound => RedeemOutcome::NotFound,
            ConsumeOutcome::Exhausted => RedeemOutcome::Exhausted,
            ConsumeOutcome::Expired => RedeemOutcome::Expired,
            ConsumeOutcome::AlreadyUsed => RedeemOutcome::AlreadyUsed,
            ConsumeOutcome::Consumed(points) => {
                if !self.ledger.credit(user, points)? {
                    return Err(LedgerError::UnknownUser(user));
                }
                tracing::info!(code, user = %user, points, "code redeemed");
                RedeemOutcome::Credited(points)
            }
        };
        Ok(outcome)
    }

    /// Codes for administrative display, newest first.
    pub fn list(&self, limit: usize) -> Result<Vec<RedemptionCode>, LedgerError> {
        Ok(self.store.list_codes(limit)?)
    }

    pub fn count(&self) -> Result<u64, LedgerError> {
        Ok(self.store.code_count()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eligo_store_memory::MemoryStore;
    use eligo_types::BonusParams;

    fn services() -> (RedemptionCodes, PointsLedger) {
        let store = Arc::new(MemoryStore::new());
        let ledger = PointsLedger::new(store.clone(), BonusParams::default());
        let codes = RedemptionCodes::new(store, ledger.clone());
        (codes, ledger)
    }

    fn now() -> Timestamp {
        Timestamp::new(1_700_000_000)
    }

    fn register(ledger: &PointsLedger, id: i64) -> UserId {
        let user = UserId::new(id);
        ledger
            .register(user, &format!("u{id}"), &format!("User {id}"), None, now())
            .unwrap();
        user
    }

    #[test]
    fn redeem_credits_once_per_user() {
        let (codes, ledger) = services();
        let admin = register(&ledger, 1);
        let user = register(&ledger, 2);

        assert!(codes
            .create_code("wandouyu", 20, admin, 1, None, now())
            .unwrap());

        assert_eq!(
            codes.redeem("wandouyu", user, now()).unwrap(),
            RedeemOutcome::Credited(20)
        );
        let balance_after_first = ledger.get(user).unwrap().balance;

        // Second redemption by the same user changes nothing.
        assert_eq!(
            codes.redeem("wandouyu", user, now()).unwrap(),
            RedeemOutcome::AlreadyUsed
        );
        assert_eq!(ledger.get(user).unwrap().balance, balance_after_first);
        assert_eq!(codes.list(10).unwrap()[0].current_uses, 1);
    }

    #[test]
    fn eleventh_user_hits_exhausted() {
        let (codes, ledger) = services();
        let admin = register(&ledger, 1);
        assert!(codes
            .create_code("vip100", 50, admin, 10, None, now())
            .unwrap());

        for id in 100..110 {
            let user = register(&ledger, id);
            assert_eq!(
                codes.redeem("vip100", user, now()).unwrap(),
                RedeemOutcome::Credited(50)
            );
        }

        let eleventh = register(&ledger, 110);
        let before = ledger.get(eleventh).unwrap().balance;
        assert_eq!(
            codes.redeem("vip100", eleventh, now()).unwrap(),
            RedeemOutcome::Exhausted
        );
        assert_eq!(ledger.get(eleventh).unwrap().balance, before);
    }

    #[test]
    fn expiry_is_relative_to_creation() {
        let (codes, ledger) = services();
        let admin = register(&ledger, 1);
        let user = register(&ledger, 2);

        codes
            .create_code("temp", 30, admin, 1, Some(7), now())
            .unwrap();

        assert_eq!(
            codes.redeem("temp", user, now().plus_days(7)).unwrap(),
            RedeemOutcome::Expired
        );
        assert_eq!(
            codes.redeem("temp", user, now().plus_days(6)).unwrap(),
            RedeemOutcome::Credited(30)
        );
    }

    #[test]
    fn unregistered_user_cannot_redeem() {
        let (codes, ledger) = services();
        let admin = register(&ledger, 1);
        codes
            .create_code("vip", 10, admin, 1, None, now())
            .unwrap();

        let result = codes.redeem("vip", UserId::new(99), now());
        assert!(matches!(result, Err(LedgerError::UnknownUser(_))));
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let (codes, ledger) = services();
        let admin = register(&ledger, 1);
        assert!(!codes.create_code("zero", 0, admin, 1, None, now()).unwrap());
        assert!(!codes.create_code("none", 10, admin, 0, None, now()).unwrap());
        assert!(!codes.create_code("", 10, admin, 1, None, now()).unwrap());
    }
}
