//! Daily check-in storage trait.

use crate::StoreError;
use eligo_types::{CalendarDate, UserId};

/// Trait for tracking daily check-ins.
///
/// Keys are `(user, calendar date)` pairs; at most one entry exists per
/// pair, and entries are immutable once written.
pub trait CheckInStore: Send + Sync {
    /// Record a check-in for the given day.
    ///
    /// Atomic insert-if-absent: returns `false` without mutation when the
    /// user already checked in on `date`.
    fn insert(&self, user: UserId, date: CalendarDate) -> Result<bool, StoreError>;

    /// Whether the user has a check-in recorded for `date`.
    fn contains(&self, user: UserId, date: CalendarDate) -> Result<bool, StoreError>;
}
