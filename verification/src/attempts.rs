//! Append-only log of verification attempts.

use crate::VerifyError;
use eligo_store::{AttemptId, AttemptStatus, AttemptStore, VerificationAttempt};
use eligo_types::{ServiceType, Timestamp, UserId};
use std::sync::Arc;

/// Attempt log service over an [`AttemptStore`].
#[derive(Clone)]
pub struct AttemptLog {
    store: Arc<dyn AttemptStore>,
}

impl AttemptLog {
    pub fn new(store: Arc<dyn AttemptStore>) -> Self {
        Self { store }
    }

    /// Append an attempt row. `status` may already be terminal when the
    /// outcome was known at submission time.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        user: UserId,
        service: ServiceType,
        source_url: &str,
        external_id: Option<&str>,
        status: AttemptStatus,
        raw_result: &str,
        cost_reserved: u64,
        now: Timestamp,
    ) -> Result<AttemptId, VerifyError> {
        let id = self.store.append(&VerificationAttempt {
            id: AttemptId::new(0),
            user,
            service,
            source_url: source_url.to_string(),
            external_id: external_id.map(str::to_string),
            status,
            raw_result: raw_result.to_string(),
            cost_reserved,
            refunded: false,
            created_at: now,
            updated_at: now,
        })?;
        tracing::debug!(attempt = %id, user = %user, service = %service, ?status, "attempt recorded");
        Ok(id)
    }

    /// Move an attempt to a new status. The only permitted mutation path
    /// besides the refund flag.
    pub fn resolve(
        &self,
        id: AttemptId,
        status: AttemptStatus,
        raw_result: &str,
        now: Timestamp,
    ) -> Result<bool, VerifyError> {
        Ok(self.store.update_status(id, status, raw_result, now)?)
    }

    /// Flip the refund flag; `true` only for the caller that won the flip.
    pub fn mark_refunded(&self, id: AttemptId, now: Timestamp) -> Result<bool, VerifyError> {
        Ok(self.store.mark_refunded(id, now)?)
    }

    pub fn get(&self, id: AttemptId) -> Result<Option<VerificationAttempt>, VerifyError> {
        Ok(self.store.get(id)?)
    }

    /// Resume handle for a later on-demand query.
    pub fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<VerificationAttempt>, VerifyError> {
        Ok(self.store.find_by_external_id(external_id)?)
    }

    pub fn history(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<VerificationAttempt>, VerifyError> {
        Ok(self.store.list_for_user(user, limit)?)
    }
}
