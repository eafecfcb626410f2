//! Points ledger services: user accounts, redemption codes, and daily
//! check-ins.
//!
//! All three services sit on the abstract stores from `eligo-store` and
//! carry their tunables as explicit constructor parameters. Nothing here
//! talks to the network; the verification side lives in
//! `eligo-verification`.

pub mod accounts;
pub mod checkin;
pub mod error;
pub mod redemption;

pub use accounts::PointsLedger;
pub use checkin::CheckIns;
pub use error::LedgerError;
pub use redemption::{RedeemOutcome, RedemptionCodes};
