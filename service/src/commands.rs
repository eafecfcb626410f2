//! User-facing commands: registration, balance, check-in, redemption, and
//! the verification entry points.
//!
//! Each method returns typed data; the chat transport is responsible for
//! rendering it (and for localisation).

use crate::{App, ServiceError};
use eligo_ledger::RedeemOutcome;
use eligo_store::{UserRecord, VerificationAttempt};
use eligo_types::{ServiceType, Timestamp, UserId};
use eligo_verification::{AttemptOutcome, QueryOutcome};

/// Reply to a registration request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterReply {
    AlreadyRegistered,
    Created {
        /// Whether a valid inviter was resolved (and credited).
        invited: bool,
    },
}

/// Reply to a successful check-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckInReply {
    pub bonus: u64,
    pub balance: u64,
}

/// Reply to a redemption request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedeemReply {
    pub outcome: RedeemOutcome,
    pub balance: u64,
}

impl App {
    /// Registered, non-blocked gate shared by the member commands.
    fn member(&self, user: UserId) -> Result<UserRecord, ServiceError> {
        if self.ledger.is_blocked(user)? {
            return Err(ServiceError::Blocked(user));
        }
        if !self.ledger.exists(user)? {
            return Err(ServiceError::NotRegistered(user));
        }
        Ok(self.ledger.get(user)?)
    }

    /// `start` — register the caller. An invite payload that is not a
    /// known user id is ignored rather than rejected.
    pub fn start(
        &self,
        user: UserId,
        username: &str,
        display_name: &str,
        invite_payload: Option<&str>,
    ) -> Result<RegisterReply, ServiceError> {
        if self.ledger.exists(user)? {
            return Ok(RegisterReply::AlreadyRegistered);
        }

        let invited_by = invite_payload
            .and_then(|payload| payload.trim().parse::<i64>().ok())
            .map(UserId::new);

        if !self
            .ledger
            .register(user, username, display_name, invited_by, Timestamp::now())?
        {
            return Ok(RegisterReply::AlreadyRegistered);
        }
        let invited = self.ledger.get(user)?.invited_by.is_some();
        Ok(RegisterReply::Created { invited })
    }

    /// `balance` — current points.
    pub fn balance(&self, user: UserId) -> Result<u64, ServiceError> {
        Ok(self.member(user)?.balance)
    }

    /// `qd` — daily check-in.
    pub fn check_in(&self, user: UserId, now: Timestamp) -> Result<CheckInReply, ServiceError> {
        self.member(user)?;
        if !self.checkins.check_in(user, now)? {
            return Err(ServiceError::AlreadyCheckedIn);
        }
        Ok(CheckInReply {
            bonus: self.ledger.bonuses().check_in,
            balance: self.ledger.get(user)?.balance,
        })
    }

    /// `use <code>` — redeem a code.
    pub fn redeem(
        &self,
        user: UserId,
        code: &str,
        now: Timestamp,
    ) -> Result<RedeemReply, ServiceError> {
        self.member(user)?;
        let outcome = self.codes.redeem(code.trim(), user, now)?;
        Ok(RedeemReply {
            outcome,
            balance: self.ledger.get(user)?.balance,
        })
    }

    /// `verify{,2,3,4,5} <url>` — start a verification attempt. The
    /// orchestrator performs its own guards and compensation.
    pub async fn verify(
        &self,
        user: UserId,
        service: ServiceType,
        url: &str,
    ) -> Result<AttemptOutcome, ServiceError> {
        Ok(self.orchestrator.submit(user, service, url.trim()).await?)
    }

    /// `check <verification_id>` — free on-demand status query.
    pub async fn check_status(
        &self,
        user: UserId,
        external_id: &str,
    ) -> Result<QueryOutcome, ServiceError> {
        self.member(user)?;
        Ok(self.orchestrator.query(external_id.trim()).await?)
    }

    /// Reconcile a still-open attempt against the remote state.
    pub async fn reconcile(
        &self,
        user: UserId,
        external_id: &str,
    ) -> Result<AttemptOutcome, ServiceError> {
        self.member(user)?;
        Ok(self.orchestrator.reconcile(external_id.trim()).await?)
    }

    /// The caller's recent verification attempts.
    pub fn history(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<VerificationAttempt>, ServiceError> {
        self.member(user)?;
        Ok(self.orchestrator.attempts().history(user, limit)?)
    }
}
