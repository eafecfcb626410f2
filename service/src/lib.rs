//! Service wiring for the eligo stack.
//!
//! Builds the ledger, redemption, check-in and verification services over a
//! storage backend and exposes them as a typed command facade. The chat
//! transport renders the replies; nothing here formats user-facing text.

pub mod admin;
pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use app::App;
pub use commands::{CheckInReply, RedeemReply, RegisterReply};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use logging::{init_logging, LogFormat};
