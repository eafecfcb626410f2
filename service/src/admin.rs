//! Administrative commands, gated on the configured admin identity.

use crate::{App, ServiceError};
use eligo_store::{RedemptionCode, UserRecord};
use eligo_types::{Timestamp, UserId};

/// Cap on the code listing, matching what fits in one reply.
const CODE_LIST_LIMIT: usize = 20;

impl App {
    fn require_admin(&self, caller: UserId) -> Result<(), ServiceError> {
        if caller != self.admin {
            return Err(ServiceError::PermissionDenied);
        }
        Ok(())
    }

    /// `addbalance <user> <points>` — returns the new balance.
    pub fn add_balance(
        &self,
        caller: UserId,
        target: UserId,
        amount: u64,
    ) -> Result<u64, ServiceError> {
        self.require_admin(caller)?;
        if amount == 0 {
            return Err(ServiceError::InvalidArgument(
                "amount must be positive".to_string(),
            ));
        }
        if !self.ledger.credit(target, amount)? {
            return Err(ServiceError::NotRegistered(target));
        }
        tracing::info!(admin = %caller, target = %target, amount, "admin credit");
        Ok(self.ledger.get(target)?.balance)
    }

    /// `deductbalance <user> <points>` — returns the new balance.
    pub fn deduct_balance(
        &self,
        caller: UserId,
        target: UserId,
        amount: u64,
    ) -> Result<u64, ServiceError> {
        self.require_admin(caller)?;
        if amount == 0 {
            return Err(ServiceError::InvalidArgument(
                "amount must be positive".to_string(),
            ));
        }
        if !self.ledger.exists(target)? {
            return Err(ServiceError::NotRegistered(target));
        }
        if !self.ledger.debit(target, amount)? {
            return Err(ServiceError::InvalidArgument(
                "balance below deduction".to_string(),
            ));
        }
        tracing::info!(admin = %caller, target = %target, amount, "admin debit");
        Ok(self.ledger.get(target)?.balance)
    }

    /// `block <user>`.
    pub fn block(&self, caller: UserId, target: UserId) -> Result<(), ServiceError> {
        self.require_admin(caller)?;
        if !self.ledger.set_blocked(target, true)? {
            return Err(ServiceError::NotRegistered(target));
        }
        tracing::info!(admin = %caller, target = %target, "user blocked");
        Ok(())
    }

    /// `white <user>`.
    pub fn unblock(&self, caller: UserId, target: UserId) -> Result<(), ServiceError> {
        self.require_admin(caller)?;
        if !self.ledger.set_blocked(target, false)? {
            return Err(ServiceError::NotRegistered(target));
        }
        tracing::info!(admin = %caller, target = %target, "user unblocked");
        Ok(())
    }

    /// `blacklist` — all currently blocked users.
    pub fn blacklist(&self, caller: UserId) -> Result<Vec<UserRecord>, ServiceError> {
        self.require_admin(caller)?;
        Ok(self.ledger.list_blocked()?)
    }

    /// `genkey <code> <points> [uses] [days]`.
    pub fn create_code(
        &self,
        caller: UserId,
        code: &str,
        point_value: u64,
        max_uses: u32,
        expire_in_days: Option<u64>,
    ) -> Result<bool, ServiceError> {
        self.require_admin(caller)?;
        if point_value == 0 {
            return Err(ServiceError::InvalidArgument(
                "points must be greater than 0".to_string(),
            ));
        }
        if max_uses == 0 {
            return Err(ServiceError::InvalidArgument(
                "usage count must be greater than 0".to_string(),
            ));
        }
        Ok(self.codes.create_code(
            code.trim(),
            point_value,
            caller,
            max_uses,
            expire_in_days,
            Timestamp::now(),
        )?)
    }

    /// `listkeys` — newest codes, capped for display.
    pub fn list_codes(&self, caller: UserId) -> Result<Vec<RedemptionCode>, ServiceError> {
        self.require_admin(caller)?;
        Ok(self.codes.list(CODE_LIST_LIMIT)?)
    }

    /// `broadcast` — recipients for an announcement; delivery is the
    /// transport's job.
    pub fn broadcast_targets(&self, caller: UserId) -> Result<Vec<UserId>, ServiceError> {
        self.require_admin(caller)?;
        Ok(self.ledger.list_all_ids()?)
    }
}
