// src/streak.rs

use crate::models::ProgressRecord;
use chrono::{DateTime, Duration, Utc};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Already active today.
    SameDay,
    Extended,
    /// First activity, or a gap of two or more days.
    Restarted,
}

/// Applies a completion at `now` to the record's streak fields.
///
/// Days are UTC calendar dates. `last_activity` only moves when the day changes.
pub fn advance(record: &mut ProgressRecord, now: DateTime<Utc>) -> StreakChange {
    let today = now.date_naive();
    let last_day = record.last_activity.map(|ts| ts.date_naive());

    let change = match last_day {
        Some(day) if day == today => StreakChange::SameDay,
        Some(day) if day + Duration::days(1) == today => StreakChange::Extended,
        _ => StreakChange::Restarted,
    };

    match change {
        StreakChange::SameDay => {}
        StreakChange::Extended => record.current_streak += 1,
        StreakChange::Restarted => record.current_streak = 1,
    }
    record.longest_streak = record.longest_streak.max(record.current_streak);

    if change != StreakChange::SameDay {
        record.last_activity = Some(now);
    }

    debug!(
        "[Streak] {}: {:?} -> current {}, longest {}",
        record.user_id, change, record.current_streak, record.longest_streak
    );
    change
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        let mut r = ProgressRecord::new("u1");
        assert_eq!(advance(&mut r, at(1, 9)), StreakChange::Restarted);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.longest_streak, 1);
        assert_eq!(r.last_activity, Some(at(1, 9)));
    }

    #[test]
    fn test_same_day_keeps_streak_and_timestamp() {
        let mut r = ProgressRecord::new("u1");
        advance(&mut r, at(1, 9));
        assert_eq!(advance(&mut r, at(1, 22)), StreakChange::SameDay);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.last_activity, Some(at(1, 9)));
    }

    #[test]
    fn test_consecutive_days_extend() {
        let mut r = ProgressRecord::new("u1");
        advance(&mut r, at(1, 23));
        // an hour later but a new calendar day
        assert_eq!(
            advance(&mut r, Utc.with_ymd_and_hms(2024, 3, 2, 0, 5, 0).unwrap()),
            StreakChange::Extended
        );
        advance(&mut r, at(3, 12));
        assert_eq!(r.current_streak, 3);
        assert_eq!(r.longest_streak, 3);
    }

    #[test]
    fn test_gap_resets_but_keeps_longest() {
        let mut r = ProgressRecord::new("u1");
        advance(&mut r, at(1, 9));
        advance(&mut r, at(2, 9));
        advance(&mut r, at(3, 9));
        assert_eq!(advance(&mut r, at(5, 9)), StreakChange::Restarted);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.longest_streak, 3);
    }

    #[test]
    fn test_month_boundary_is_consecutive() {
        let mut r = ProgressRecord::new("u1");
        advance(&mut r, Utc.with_ymd_and_hms(2024, 2, 29, 18, 0, 0).unwrap());
        assert_eq!(advance(&mut r, at(1, 8)), StreakChange::Extended);
        assert_eq!(r.current_streak, 2);
    }
}
