use eligo_types::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("user not registered: {0}")]
    NotRegistered(UserId),

    #[error("user is blocked: {0}")]
    Blocked(UserId),

    #[error("already checked in today")]
    AlreadyCheckedIn,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] eligo_ledger::LedgerError),

    #[error("verification error: {0}")]
    Verify(#[from] eligo_verification::VerifyError),

    #[error("store error: {0}")]
    Store(#[from] eligo_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
