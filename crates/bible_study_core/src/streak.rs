//! crates/bible_study_core/src/streak.rs
//!
//! Consecutive-day reading streak arithmetic. Pure transition function;
//! persistence happens behind the database port.

use chrono::{Duration, NaiveDate};

use crate::domain::ReadingStreak;

/// Applies one day of reading activity to a streak.
///
/// Same-day activity is a no-op; the day after the last read extends the
/// streak; any gap (including backdated activity) resets it to 1.
pub fn record_activity(streak: &mut ReadingStreak, date: NaiveDate) {
    match streak.last_read_date {
        Some(last) if last == date => return,
        Some(last) if date == last + Duration::days(1) => {
            streak.current_streak += 1;
        }
        _ => {
            streak.current_streak = 1;
        }
    }
    streak.last_read_date = Some(date);
    streak.longest_streak = streak.longest_streak.max(streak.current_streak);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn fresh() -> ReadingStreak {
        ReadingStreak {
            user_id: Uuid::new_v4(),
            current_streak: 0,
            longest_streak: 0,
            last_read_date: None,
        }
    }

    #[test]
    fn first_activity_starts_a_streak_of_one() {
        let mut streak = fresh();
        record_activity(&mut streak, day(1));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 1);
        assert_eq!(streak.last_read_date, Some(day(1)));
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let mut streak = fresh();
        record_activity(&mut streak, day(1));
        record_activity(&mut streak, day(2));
        record_activity(&mut streak, day(3));
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.longest_streak, 3);
    }

    #[test]
    fn same_day_activity_is_a_no_op() {
        let mut streak = fresh();
        record_activity(&mut streak, day(1));
        record_activity(&mut streak, day(1));
        assert_eq!(streak.current_streak, 1);
    }

    #[test]
    fn a_gap_resets_but_longest_is_kept() {
        let mut streak = fresh();
        record_activity(&mut streak, day(1));
        record_activity(&mut streak, day(2));
        record_activity(&mut streak, day(3));
        record_activity(&mut streak, day(10));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 3);
    }

    #[test]
    fn backdated_activity_counts_as_a_reset() {
        let mut streak = fresh();
        record_activity(&mut streak, day(5));
        record_activity(&mut streak, day(2));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_read_date, Some(day(2)));
    }
}
