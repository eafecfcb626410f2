//! Verification lifecycle orchestration.
//!
//! Drives a verification attempt from submission through bounded-concurrency
//! verifier execution, asynchronous remote review polling, and balance
//! compensation on failure. The per-service verifier capability is consumed
//! through the [`Verifier`] trait; the remote status endpoint through
//! [`StatusBackend`].

pub mod attempts;
pub mod error;
pub mod limiter;
pub mod orchestrator;
pub mod status;
pub mod verifier;

pub use attempts::AttemptLog;
pub use error::VerifyError;
pub use limiter::{ServiceLimiter, ServicePermit};
pub use orchestrator::{AttemptOutcome, QueryOutcome, VerificationOrchestrator};
pub use status::{
    HttpStatusBackend, PollResult, QueryError, RemoteStatus, StatusBackend, StatusPoller,
};
pub use verifier::{Submission, Verifier, VerifierError};
