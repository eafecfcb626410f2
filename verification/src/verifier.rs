//! The per-service verifier capability boundary.
//!
//! Each eligibility program ships its own implementation (document
//! generation, submission mechanics); the orchestrator only sees the link
//! parser and the tagged submission outcome.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Outcome of one verifier submission.
///
/// Expected results are data, not exceptions: a rejection is a `Rejected`
/// value, and only infrastructure failures travel the error channel.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Submission {
    /// Verified with no further review; the reward is already in hand.
    Complete {
        reward_code: Option<String>,
        redirect_url: Option<String>,
    },
    /// Submission accepted; a remote review is now pending under
    /// `external_id`.
    UnderReview {
        external_id: String,
        redirect_url: Option<String>,
    },
    /// The service rejected the submission outright.
    Rejected { message: String },
}

/// Unexpected verifier failure (network down, service 500s, broken
/// invariant inside the capability).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct VerifierError(pub String);

/// A single eligibility program's verification capability.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Validate the link shape and extract the remote verification id.
    /// Pure and synchronous.
    fn parse_verification_id(&self, url: &str) -> Option<String>;

    /// Build and submit the eligibility documents for `verification_id`.
    ///
    /// May be slow; the orchestrator invokes it under a concurrency-limiter
    /// permit and off the dispatcher.
    async fn verify(&self, verification_id: &str) -> Result<Submission, VerifierError>;
}
