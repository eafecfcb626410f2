use proptest::prelude::*;

use eligo_types::{CalendarDate, Timestamp, UserId};

proptest! {
    /// Timestamp ordering mirrors the raw seconds.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// elapsed_since never underflows, even with a clock running backwards.
    #[test]
    fn elapsed_since_saturates(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let earlier = Timestamp::new(a);
        let later = Timestamp::new(b);
        prop_assert_eq!(earlier.elapsed_since(later), b.saturating_sub(a));
    }

    /// Calendar dates are monotone in the underlying timestamp.
    #[test]
    fn calendar_date_is_monotone(a in 0u64..1_000_000_000_000, b in 0u64..1_000_000_000_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let d_lo = Timestamp::new(lo).calendar_date();
        let d_hi = Timestamp::new(hi).calendar_date();
        prop_assert!(d_lo <= d_hi);
    }

    /// Advancing by one day always lands on the next calendar date.
    #[test]
    fn plus_one_day_advances_the_date(secs in 0u64..1_000_000_000_000) {
        let now = Timestamp::new(secs);
        prop_assert_eq!(
            now.plus_days(1).calendar_date(),
            now.calendar_date().next()
        );
    }

    /// UserId round-trips through its raw representation.
    #[test]
    fn user_id_round_trip(raw in any::<i64>()) {
        prop_assert_eq!(UserId::new(raw).as_i64(), raw);
    }

    /// CalendarDate::next is strictly increasing until saturation.
    #[test]
    fn next_date_is_greater(days in 0u32..u32::MAX) {
        let date = CalendarDate::new(days);
        prop_assert!(date.next() > date);
    }
}
