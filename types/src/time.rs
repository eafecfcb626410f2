//! Timestamp and calendar-date types.
//!
//! Timestamps are Unix epoch seconds (UTC). Calendar dates are UTC day
//! numbers since the epoch; the daily check-in window is keyed on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const SECS_PER_DAY: u64 = 86_400;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// This timestamp advanced by a whole number of days.
    pub fn plus_days(&self, days: u64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(SECS_PER_DAY)))
    }

    /// The UTC calendar date this timestamp falls on.
    pub fn calendar_date(&self) -> CalendarDate {
        CalendarDate((self.0 / SECS_PER_DAY) as u32)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// A UTC calendar day, counted in whole days since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate(u32);

impl CalendarDate {
    pub fn new(days_since_epoch: u32) -> Self {
        Self(days_since_epoch)
    }

    pub fn as_days(&self) -> u32 {
        self.0
    }

    /// The day after this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}
