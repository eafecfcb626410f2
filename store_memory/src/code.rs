//! Redemption code backend.

use crate::{poisoned, MemoryStore};
use eligo_store::{CodeStore, ConsumeOutcome, RedemptionCode, StoreError};
use eligo_types::{Timestamp, UserId};

impl CodeStore for MemoryStore {
    fn insert_code(&self, code: &RedemptionCode) -> Result<bool, StoreError> {
        let mut table = self.codes.lock().map_err(|_| poisoned("code table"))?;
        if table.codes.contains_key(&code.code) {
            return Ok(false);
        }
        table.order.push(code.code.clone());
        table.codes.insert(code.code.clone(), code.clone());
        Ok(true)
    }

    fn get_code(&self, code: &str) -> Result<Option<RedemptionCode>, StoreError> {
        let table = self.codes.lock().map_err(|_| poisoned("code table"))?;
        Ok(table.codes.get(code).cloned())
    }

    fn consume(
        &self,
        code: &str,
        user: UserId,
        now: Timestamp,
    ) -> Result<ConsumeOutcome, StoreError> {
        // Validation, counter increment, and record insertion all happen
        // under the one table lock, so no partial consumption is ever
        // observable.
        let mut table = self.codes.lock().map_err(|_| poisoned("code table"))?;

        let record_key = (code.to_string(), user);
        let Some(entry) = table.codes.get(code) else {
            return Ok(ConsumeOutcome::NotFound);
        };
        if entry.is_exhausted() {
            return Ok(ConsumeOutcome::Exhausted);
        }
        if entry.is_expired(now) {
            return Ok(ConsumeOutcome::Expired);
        }
        if table.records.contains(&record_key) {
            return Ok(ConsumeOutcome::AlreadyUsed);
        }

        let point_value = entry.point_value;
        if let Some(entry) = table.codes.get_mut(code) {
            entry.current_uses += 1;
        }
        table.records.insert(record_key);
        Ok(ConsumeOutcome::Consumed(point_value))
    }

    fn list_codes(&self, limit: usize) -> Result<Vec<RedemptionCode>, StoreError> {
        let table = self.codes.lock().map_err(|_| poisoned("code table"))?;
        Ok(table
            .order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|key| table.codes.get(key).cloned())
            .collect())
    }

    fn code_count(&self) -> Result<u64, StoreError> {
        let table = self.codes.lock().map_err(|_| poisoned("code table"))?;
        Ok(table.codes.len() as u64)
    }
}
