//! In-memory storage backend for the eligo services.
//!
//! Implements every trait from `eligo-store` over plain collections. User
//! records live behind per-user mutexes in a shared registry, so mutations
//! of one user are serialized while different users proceed concurrently;
//! the code and check-in tables commit their composite validations as one
//! critical section each.

mod attempt;
mod checkin;
mod code;
mod user;

use eligo_store::StoreError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use eligo_store::{RedemptionCode, UserRecord, VerificationAttempt};
use eligo_types::{CalendarDate, UserId};

/// Thread-safe in-memory store implementing all storage traits.
pub struct MemoryStore {
    /// Per-user records behind per-user locks.
    pub(crate) users: RwLock<HashMap<UserId, Arc<Mutex<UserRecord>>>>,
    /// Codes, creation order, and (code, user) redemption records — one
    /// lock, so consumption commits as a unit.
    pub(crate) codes: Mutex<CodeTable>,
    pub(crate) checkins: Mutex<HashSet<(UserId, CalendarDate)>>,
    pub(crate) attempts: Mutex<AttemptTable>,
}

#[derive(Default)]
pub(crate) struct CodeTable {
    pub(crate) codes: HashMap<String, RedemptionCode>,
    /// Code keys in creation order.
    pub(crate) order: Vec<String>,
    pub(crate) records: HashSet<(String, UserId)>,
}

#[derive(Default)]
pub(crate) struct AttemptTable {
    pub(crate) next_id: u64,
    pub(crate) rows: HashMap<u64, VerificationAttempt>,
    pub(crate) by_external: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            codes: Mutex::new(CodeTable::default()),
            checkins: Mutex::new(HashSet::new()),
            attempts: Mutex::new(AttemptTable::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Error produced when a poisoned lock is encountered.
pub(crate) fn poisoned(what: &str) -> StoreError {
    StoreError::Backend(format!("{what} lock poisoned"))
}
