//! Verification attempt log backend.

use crate::{poisoned, MemoryStore};
use eligo_store::{AttemptId, AttemptStatus, AttemptStore, StoreError, VerificationAttempt};
use eligo_types::{Timestamp, UserId};

impl AttemptStore for MemoryStore {
    fn append(&self, attempt: &VerificationAttempt) -> Result<AttemptId, StoreError> {
        let mut table = self.attempts.lock().map_err(|_| poisoned("attempt log"))?;
        table.next_id += 1;
        let id = AttemptId::new(table.next_id);

        let mut row = attempt.clone();
        row.id = id;
        if let Some(external) = &row.external_id {
            table.by_external.insert(external.clone(), id.as_u64());
        }
        table.rows.insert(id.as_u64(), row);
        Ok(id)
    }

    fn update_status(
        &self,
        id: AttemptId,
        status: AttemptStatus,
        raw_result: &str,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        let mut table = self.attempts.lock().map_err(|_| poisoned("attempt log"))?;
        let Some(row) = table.rows.get_mut(&id.as_u64()) else {
            return Ok(false);
        };
        row.status = status;
        row.raw_result = raw_result.to_string();
        row.updated_at = now;
        Ok(true)
    }

    fn mark_refunded(&self, id: AttemptId, now: Timestamp) -> Result<bool, StoreError> {
        let mut table = self.attempts.lock().map_err(|_| poisoned("attempt log"))?;
        let row = table
            .rows
            .get_mut(&id.as_u64())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if row.refunded {
            return Ok(false);
        }
        row.refunded = true;
        row.updated_at = now;
        Ok(true)
    }

    fn get(&self, id: AttemptId) -> Result<Option<VerificationAttempt>, StoreError> {
        let table = self.attempts.lock().map_err(|_| poisoned("attempt log"))?;
        Ok(table.rows.get(&id.as_u64()).cloned())
    }

    fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<VerificationAttempt>, StoreError> {
        let table = self.attempts.lock().map_err(|_| poisoned("attempt log"))?;
        Ok(table
            .by_external
            .get(external_id)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    fn list_for_user(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<VerificationAttempt>, StoreError> {
        let table = self.attempts.lock().map_err(|_| poisoned("attempt log"))?;
        let mut rows: Vec<VerificationAttempt> = table
            .rows
            .values()
            .filter(|row| row.user == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eligo_types::ServiceType;

    fn attempt(user: i64, external: Option<&str>) -> VerificationAttempt {
        VerificationAttempt {
            id: AttemptId::new(0),
            user: UserId::new(user),
            service: ServiceType::BoltTeacher,
            source_url: "https://services.sheerid.com/verify/abc/".to_string(),
            external_id: external.map(str::to_string),
            status: AttemptStatus::Pending,
            raw_result: String::new(),
            cost_reserved: 5,
            refunded: false,
            created_at: Timestamp::new(1_700_000_000),
            updated_at: Timestamp::new(1_700_000_000),
        }
    }

    #[test]
    fn append_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.append(&attempt(1, None)).unwrap();
        let b = store.append(&attempt(1, None)).unwrap();
        assert!(b > a);
        assert_eq!(store.get(a).unwrap().unwrap().id, a);
    }

    #[test]
    fn external_id_lookup_finds_the_row() {
        let store = MemoryStore::new();
        let id = store.append(&attempt(1, Some("vid1"))).unwrap();
        let found = store.find_by_external_id("vid1").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(store.find_by_external_id("vid2").unwrap().is_none());
    }

    #[test]
    fn refund_flag_flips_exactly_once() {
        let store = MemoryStore::new();
        let id = store.append(&attempt(1, None)).unwrap();
        let now = Timestamp::new(1_700_000_100);

        assert!(store.mark_refunded(id, now).unwrap());
        assert!(!store.mark_refunded(id, now).unwrap());
        assert!(store.get(id).unwrap().unwrap().refunded);

        let missing = store.mark_refunded(AttemptId::new(999), now);
        assert!(missing.is_err());
    }

    #[test]
    fn user_history_is_newest_first() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            store.append(&attempt(1, None)).unwrap();
        }
        store.append(&attempt(2, None)).unwrap();

        let rows = store.list_for_user(UserId::new(1), 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].id > rows[1].id);
    }
}
