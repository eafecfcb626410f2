//! Abstract storage traits for the eligo services.
//!
//! Every storage backend (the in-memory reference backend, a future SQL
//! backend) implements these traits. The rest of the workspace depends only
//! on the traits. Operations with atomicity requirements — the conditional
//! debit, code consumption, check-in insertion, the refund flag — are
//! expressed as single trait methods so a backend can commit them as one
//! unit.

pub mod attempt;
pub mod checkin;
pub mod code;
pub mod error;
pub mod user;

pub use attempt::{AttemptId, AttemptStatus, AttemptStore, VerificationAttempt};
pub use checkin::CheckInStore;
pub use code::{CodeStore, ConsumeOutcome, RedemptionCode};
pub use error::StoreError;
pub use user::{UserRecord, UserStore};
