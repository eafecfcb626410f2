//! The verification orchestrator — the end-to-end attempt state machine.
//!
//! Composes the ledger, the attempt log, the concurrency limiter, the
//! status poller and the per-service verifier capabilities:
//!
//! ```text
//! Init → BalanceChecked → Reserved → Submitted
//!      → { Completed | Rejected | AwaitingReview }
//!      → { Completed | ReviewFailed | StillPending }
//! ```
//!
//! Once cost is reserved, every failure path credits it back exactly once;
//! a poll window elapsing is not a failure and leaves the attempt open for
//! the free on-demand query.

use crate::attempts::AttemptLog;
use crate::limiter::ServiceLimiter;
use crate::status::{PollResult, RemoteStatus, StatusPoller};
use crate::verifier::{Submission, Verifier};
use crate::VerifyError;
use eligo_ledger::PointsLedger;
use eligo_store::{AttemptId, AttemptStatus, VerificationAttempt};
use eligo_types::{ServiceParams, ServiceType, Timestamp, UserId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Terminal disposition of a submission, as surfaced to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Verified; the reward is in hand. Never refunded.
    Completed {
        attempt: AttemptId,
        reward_code: Option<String>,
        redirect_url: Option<String>,
    },
    /// The verifier rejected the submission; the reserved cost came back.
    Rejected {
        attempt: AttemptId,
        reason: String,
        refunded: u64,
    },
    /// The remote review rejected the attempt; the reserved cost came back.
    ReviewFailed {
        attempt: AttemptId,
        error_ids: Vec<String>,
        refunded: u64,
    },
    /// The review outlived the poll window. No refund, no failure: later
    /// on-demand queries against `external_id` are free.
    StillPending {
        attempt: AttemptId,
        external_id: String,
    },
}

/// Result of a free on-demand status query. Read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryOutcome {
    Approved {
        reward_code: Option<String>,
        redirect_url: Option<String>,
    },
    UnderReview,
    Rejected { error_ids: Vec<String> },
    /// A non-terminal remote step, reported verbatim.
    Other(String),
}

/// The orchestrator ties the verification subsystems together.
pub struct VerificationOrchestrator {
    ledger: PointsLedger,
    attempts: AttemptLog,
    limiter: ServiceLimiter,
    poller: StatusPoller,
    verifiers: HashMap<ServiceType, Arc<dyn Verifier>>,
    services: BTreeMap<ServiceType, ServiceParams>,
}

impl VerificationOrchestrator {
    /// All collaborators and the per-service parameter table are supplied
    /// at construction; there is no ambient state and no default table.
    pub fn new(
        ledger: PointsLedger,
        attempts: AttemptLog,
        limiter: ServiceLimiter,
        poller: StatusPoller,
        verifiers: HashMap<ServiceType, Arc<dyn Verifier>>,
        services: BTreeMap<ServiceType, ServiceParams>,
    ) -> Self {
        Self {
            ledger,
            attempts,
            limiter,
            poller,
            verifiers,
            services,
        }
    }

    pub fn attempts(&self) -> &AttemptLog {
        &self.attempts
    }

    /// Drive one verification attempt from submission to disposition.
    pub async fn submit(
        &self,
        user: UserId,
        service: ServiceType,
        url: &str,
    ) -> Result<AttemptOutcome, VerifyError> {
        let params = *self
            .services
            .get(&service)
            .ok_or(VerifyError::ServiceNotConfigured(service))?;
        let verifier = self
            .verifiers
            .get(&service)
            .cloned()
            .ok_or(VerifyError::ServiceNotConfigured(service))?;

        // Validation: no balance has moved yet, so failures need no
        // compensation.
        if self.ledger.is_blocked(user)? {
            return Err(VerifyError::Blocked(user));
        }
        if !self.ledger.exists(user)? {
            return Err(VerifyError::UnknownUser(user));
        }
        let balance = self.ledger.get(user)?.balance;
        if balance < params.verify_cost {
            return Err(VerifyError::InsufficientBalance {
                needed: params.verify_cost,
                available: balance,
            });
        }
        let verification_id = verifier
            .parse_verification_id(url)
            .ok_or(VerifyError::InvalidLink)?;

        // Reserve the cost. The debit re-checks atomically: a concurrent
        // spend may have emptied the balance since the check above.
        let cost = params.verify_cost;
        if !self.ledger.debit(user, cost)? {
            return Err(VerifyError::DeductionFailed);
        }
        tracing::info!(user = %user, service = %service, cost, "verification cost reserved");

        // Submit under a permit; the permit drops before any polling.
        let submission = {
            let permit = match self.limiter.acquire(service).await {
                Ok(permit) => permit,
                Err(e) => {
                    self.refund_unrecorded(user, cost)?;
                    return Err(e);
                }
            };
            let result = verifier.verify(&verification_id).await;
            drop(permit);
            result
        };

        let now = Timestamp::now();
        match submission {
            Ok(Submission::Complete {
                reward_code,
                redirect_url,
            }) => {
                let raw = raw_payload(&Submission::Complete {
                    reward_code: reward_code.clone(),
                    redirect_url: redirect_url.clone(),
                });
                let attempt = self.attempts.record(
                    user,
                    service,
                    url,
                    Some(verification_id.as_str()),
                    AttemptStatus::Success,
                    &raw,
                    cost,
                    now,
                )?;
                tracing::info!(user = %user, attempt = %attempt, "verification succeeded");
                Ok(AttemptOutcome::Completed {
                    attempt,
                    reward_code,
                    redirect_url,
                })
            }

            Ok(Submission::Rejected { message }) => {
                let raw = raw_payload(&Submission::Rejected {
                    message: message.clone(),
                });
                let attempt = self.attempts.record(
                    user,
                    service,
                    url,
                    Some(verification_id.as_str()),
                    AttemptStatus::Failed,
                    &raw,
                    cost,
                    now,
                )?;
                let refunded = self.refund(attempt, user, cost, now)?;
                tracing::warn!(user = %user, attempt = %attempt, "submission rejected: {message}");
                Ok(AttemptOutcome::Rejected {
                    attempt,
                    reason: message,
                    refunded,
                })
            }

            Err(e) => {
                let attempt = self.attempts.record(
                    user,
                    service,
                    url,
                    Some(verification_id.as_str()),
                    AttemptStatus::Failed,
                    &e.to_string(),
                    cost,
                    now,
                )?;
                self.refund(attempt, user, cost, now)?;
                tracing::error!(user = %user, attempt = %attempt, "verifier error: {e}");
                Err(VerifyError::Verifier(e.to_string()))
            }

            Ok(Submission::UnderReview {
                external_id,
                redirect_url,
            }) => {
                let raw = raw_payload(&Submission::UnderReview {
                    external_id: external_id.clone(),
                    redirect_url: redirect_url.clone(),
                });
                let attempt = self.attempts.record(
                    user,
                    service,
                    url,
                    Some(external_id.as_str()),
                    AttemptStatus::Pending,
                    &raw,
                    cost,
                    now,
                )?;
                tracing::info!(
                    user = %user,
                    attempt = %attempt,
                    external_id,
                    window_secs = params.poll_window_secs,
                    "submission accepted, awaiting remote review"
                );

                let result = self
                    .poller
                    .poll(&external_id, Duration::from_secs(params.poll_window_secs))
                    .await;
                self.settle_poll(attempt, user, cost, &external_id, redirect_url, result)
            }
        }
    }

    /// Apply a poll result to an open attempt.
    fn settle_poll(
        &self,
        attempt: AttemptId,
        user: UserId,
        cost: u64,
        external_id: &str,
        submit_redirect: Option<String>,
        result: PollResult,
    ) -> Result<AttemptOutcome, VerifyError> {
        let now = Timestamp::now();
        match result {
            PollResult::Success {
                reward_code,
                redirect_url,
            } => {
                let raw = format!("review approved, rewardCode={reward_code:?}");
                self.attempts
                    .resolve(attempt, AttemptStatus::Success, &raw, now)?;
                Ok(AttemptOutcome::Completed {
                    attempt,
                    reward_code,
                    redirect_url: redirect_url.or(submit_redirect),
                })
            }
            PollResult::Error { error_ids } => {
                let raw = format!("review rejected, errorIds={error_ids:?}");
                self.attempts
                    .resolve(attempt, AttemptStatus::Failed, &raw, now)?;
                let refunded = self.refund(attempt, user, cost, now)?;
                Ok(AttemptOutcome::ReviewFailed {
                    attempt,
                    error_ids,
                    refunded,
                })
            }
            PollResult::TimedOut => Ok(AttemptOutcome::StillPending {
                attempt,
                external_id: external_id.to_string(),
            }),
        }
    }

    /// One free status query, no polling loop, no mutation. Transport
    /// failures surface to the caller with a suggestion to retry.
    pub async fn query(&self, external_id: &str) -> Result<QueryOutcome, VerifyError> {
        let status = self.poller.fetch_once(external_id).await?;
        Ok(match status {
            RemoteStatus::Success {
                reward_code,
                redirect_url,
            } => QueryOutcome::Approved {
                reward_code,
                redirect_url,
            },
            RemoteStatus::Pending => QueryOutcome::UnderReview,
            RemoteStatus::Rejected { error_ids } => QueryOutcome::Rejected { error_ids },
            RemoteStatus::Other(step) => QueryOutcome::Other(step),
        })
    }

    /// Explicitly reconcile a stored attempt against the remote state.
    ///
    /// A still-open attempt is resolved the same way the push path would
    /// have resolved it; an already-terminal attempt is reported without
    /// mutation. Repeated calls can never double-refund: the attempt log's
    /// refund flag is a one-shot gate.
    pub async fn reconcile(&self, external_id: &str) -> Result<AttemptOutcome, VerifyError> {
        let attempt = self
            .attempts
            .find_by_external_id(external_id)?
            .ok_or_else(|| VerifyError::UnknownAttempt(external_id.to_string()))?;

        let status = self.poller.fetch_once(external_id).await?;
        match attempt.status {
            AttemptStatus::Pending => {
                let result = match status {
                    RemoteStatus::Success {
                        reward_code,
                        redirect_url,
                    } => PollResult::Success {
                        reward_code,
                        redirect_url,
                    },
                    RemoteStatus::Rejected { error_ids } => PollResult::Error { error_ids },
                    RemoteStatus::Pending | RemoteStatus::Other(_) => PollResult::TimedOut,
                };
                self.settle_poll(
                    attempt.id,
                    attempt.user,
                    attempt.cost_reserved,
                    external_id,
                    None,
                    result,
                )
            }
            AttemptStatus::Success => Ok(terminal_success(&attempt, status)),
            AttemptStatus::Failed => Ok(AttemptOutcome::ReviewFailed {
                attempt: attempt.id,
                error_ids: match status {
                    RemoteStatus::Rejected { error_ids } => error_ids,
                    _ => Vec::new(),
                },
                refunded: 0,
            }),
        }
    }

    /// Refund the reserved cost for a recorded attempt, exactly once.
    fn refund(
        &self,
        attempt: AttemptId,
        user: UserId,
        cost: u64,
        now: Timestamp,
    ) -> Result<u64, VerifyError> {
        if !self.attempts.mark_refunded(attempt, now)? {
            return Ok(0);
        }
        if !self.ledger.credit(user, cost)? {
            tracing::error!(user = %user, attempt = %attempt, "refund credit failed: user vanished");
            return Ok(0);
        }
        tracing::info!(user = %user, attempt = %attempt, cost, "reserved cost refunded");
        Ok(cost)
    }

    /// Refund a reservation that never produced an attempt row (failure
    /// between debit and submission).
    fn refund_unrecorded(&self, user: UserId, cost: u64) -> Result<(), VerifyError> {
        if !self.ledger.credit(user, cost)? {
            tracing::error!(user = %user, "refund credit failed: user vanished");
        }
        Ok(())
    }
}

/// Report an already-successful attempt, enriched with whatever the remote
/// side still returns.
fn terminal_success(attempt: &VerificationAttempt, status: RemoteStatus) -> AttemptOutcome {
    let (reward_code, redirect_url) = match status {
        RemoteStatus::Success {
            reward_code,
            redirect_url,
        } => (reward_code, redirect_url),
        _ => (None, None),
    };
    AttemptOutcome::Completed {
        attempt: attempt.id,
        reward_code,
        redirect_url,
    }
}

fn raw_payload(submission: &Submission) -> String {
    serde_json::to_string(submission).unwrap_or_else(|_| format!("{submission:?}"))
}
