//! Check-in backend.

use crate::{poisoned, MemoryStore};
use eligo_store::{CheckInStore, StoreError};
use eligo_types::{CalendarDate, UserId};

impl CheckInStore for MemoryStore {
    fn insert(&self, user: UserId, date: CalendarDate) -> Result<bool, StoreError> {
        let mut checkins = self.checkins.lock().map_err(|_| poisoned("check-in table"))?;
        Ok(checkins.insert((user, date)))
    }

    fn contains(&self, user: UserId, date: CalendarDate) -> Result<bool, StoreError> {
        let checkins = self.checkins.lock().map_err(|_| poisoned("check-in table"))?;
        Ok(checkins.contains(&(user, date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_check_in_per_user_per_day() {
        let store = MemoryStore::new();
        let user = UserId::new(9);
        let today = CalendarDate::new(20_000);

        assert!(store.insert(user, today).unwrap());
        assert!(!store.insert(user, today).unwrap());
        assert!(store.contains(user, today).unwrap());

        // A different day or user is an independent key.
        assert!(store.insert(user, today.next()).unwrap());
        assert!(store.insert(UserId::new(10), today).unwrap());
    }
}
