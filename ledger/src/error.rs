use eligo_types::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("store error: {0}")]
    Store(#[from] eligo_store::StoreError),

    #[error("user not registered: {0}")]
    UnknownUser(UserId),
}
