//! User registry backend.
//!
//! Records are held behind per-user mutexes so balance mutations of one
//! user are serialized while different users are touched concurrently. The
//! registry map itself is only write-locked during registration.

use crate::{poisoned, MemoryStore};
use eligo_store::{StoreError, UserRecord, UserStore};
use eligo_types::UserId;
use std::sync::{Arc, Mutex};

impl MemoryStore {
    /// Look up the shared handle for a user's record.
    fn user_entry(&self, id: UserId) -> Result<Option<Arc<Mutex<UserRecord>>>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned("user table"))?;
        Ok(users.get(&id).cloned())
    }
}

impl UserStore for MemoryStore {
    fn create_user(&self, record: &UserRecord) -> Result<bool, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned("user table"))?;
        if users.contains_key(&record.id) {
            return Ok(false);
        }
        users.insert(record.id, Arc::new(Mutex::new(record.clone())));
        Ok(true)
    }

    fn get_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        let entry = self
            .user_entry(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let record = entry.lock().map_err(|_| poisoned("user record"))?;
        Ok(record.clone())
    }

    fn exists(&self, id: UserId) -> Result<bool, StoreError> {
        let users = self.users.read().map_err(|_| poisoned("user table"))?;
        Ok(users.contains_key(&id))
    }

    fn credit(&self, id: UserId, amount: u64) -> Result<bool, StoreError> {
        let Some(entry) = self.user_entry(id)? else {
            return Ok(false);
        };
        let mut record = entry.lock().map_err(|_| poisoned("user record"))?;
        record.balance = record.balance.saturating_add(amount);
        Ok(true)
    }

    fn debit(&self, id: UserId, amount: u64) -> Result<bool, StoreError> {
        let Some(entry) = self.user_entry(id)? else {
            return Ok(false);
        };
        // Test-and-decrement under the record lock: concurrent debits
        // observe a total order and the balance can never go negative.
        let mut record = entry.lock().map_err(|_| poisoned("user record"))?;
        if record.balance < amount {
            return Ok(false);
        }
        record.balance -= amount;
        Ok(true)
    }

    fn set_blocked(&self, id: UserId, blocked: bool) -> Result<bool, StoreError> {
        let Some(entry) = self.user_entry(id)? else {
            return Ok(false);
        };
        let mut record = entry.lock().map_err(|_| poisoned("user record"))?;
        record.blocked = blocked;
        Ok(true)
    }

    fn list_blocked(&self) -> Result<Vec<UserRecord>, StoreError> {
        let entries: Vec<Arc<Mutex<UserRecord>>> = {
            let users = self.users.read().map_err(|_| poisoned("user table"))?;
            users.values().cloned().collect()
        };
        let mut blocked = Vec::new();
        for entry in entries {
            let record = entry.lock().map_err(|_| poisoned("user record"))?;
            if record.blocked {
                blocked.push(record.clone());
            }
        }
        blocked.sort_by_key(|r| r.id);
        Ok(blocked)
    }

    fn list_user_ids(&self) -> Result<Vec<UserId>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned("user table"))?;
        let mut ids: Vec<UserId> = users.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
