//! crates/bible_study_core/src/plan.rs
//!
//! Plan lifecycle logic: turning a distribution result into dated daily
//! readings, day completion, aggregate progress, and access checks.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::distribution::DayAssignment;
use crate::domain::{DailyReading, PlanProgress, PlanStatus, ReadingPlan};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Plan has no day {0}")]
    DayNotFound(u32),
}

/// Stamps each assignment with its calendar date:
/// `start_date + (day_number - 1)` days.
pub fn build_days(assignments: Vec<DayAssignment>, start_date: NaiveDate) -> Vec<DailyReading> {
    assignments
        .into_iter()
        .map(|assignment| DailyReading {
            date: start_date + Duration::days(i64::from(assignment.day_number) - 1),
            day_number: assignment.day_number,
            readings: assignment.readings,
            is_completed: false,
            completed_at: None,
        })
        .collect()
}

/// Marks the given day complete and flips the plan to `Completed` once
/// every day is done. Re-marking an already-complete day refreshes
/// `completed_at` but leaves `is_completed` true.
pub fn mark_day_complete(
    plan: &mut ReadingPlan,
    day_number: u32,
    now: DateTime<Utc>,
) -> Result<(), PlanError> {
    let day = plan
        .days
        .iter_mut()
        .find(|d| d.day_number == day_number)
        .ok_or(PlanError::DayNotFound(day_number))?;
    day.is_completed = true;
    day.completed_at = Some(now);

    if plan.days.iter().all(|d| d.is_completed) {
        plan.status = PlanStatus::Completed;
    }
    Ok(())
}

/// Rounds a ratio to a percentage with two decimal places.
fn percent(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let raw = f64::from(numerator) / f64::from(denominator) * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Computes day-based and chapter-weighted completion percentages.
pub fn progress(plan: &ReadingPlan) -> PlanProgress {
    let total_days = plan.days.len() as u32;
    let completed_days = plan.days.iter().filter(|d| d.is_completed).count() as u32;
    let total_chapters: u32 = plan.days.iter().map(DailyReading::chapter_count).sum();
    let completed_chapters: u32 = plan
        .days
        .iter()
        .filter(|d| d.is_completed)
        .map(DailyReading::chapter_count)
        .sum();

    PlanProgress {
        completed_days,
        total_days,
        day_percent: percent(completed_days, total_days),
        chapter_percent: percent(completed_chapters, total_chapters),
        status: plan.status,
    }
}

/// Read access: the owner, anyone when the plan is public, or a listed
/// shared viewer.
pub fn can_view(plan: &ReadingPlan, requester: Uuid) -> bool {
    plan.user_id == requester || plan.is_public || plan.shared_with.contains(&requester)
}

/// Write access is owner-only; sharing never grants mutation.
pub fn can_modify(plan: &ReadingPlan, requester: Uuid) -> bool {
    plan.user_id == requester
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible::BibleIndex;
    use crate::distribution::distribute;
    use crate::domain::ScriptureRange;
    use crate::range::validate;

    fn test_plan(start_chapter: u32, end_chapter: u32, days: u32) -> ReadingPlan {
        let index = BibleIndex::canonical();
        let normalized = validate(
            &index,
            &ScriptureRange {
                start_book: "Genesis".to_string(),
                start_chapter,
                end_book: "Genesis".to_string(),
                end_chapter: Some(end_chapter),
            },
        )
        .unwrap();
        let assignments = distribute(&index, &normalized, days).unwrap();
        let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let plan_days = build_days(assignments, start_date);
        let duration = plan_days.len() as u32;
        ReadingPlan {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Genesis".to_string(),
            start_book: normalized.start_book,
            start_chapter: normalized.start_chapter,
            end_book: normalized.end_book,
            end_chapter: normalized.end_chapter,
            start_date,
            duration_in_days: duration,
            days: plan_days,
            status: PlanStatus::Active,
            is_public: false,
            shared_with: Vec::new(),
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn dates_advance_one_day_per_day_number() {
        let plan = test_plan(1, 10, 5);
        for day in &plan.days {
            assert_eq!(
                day.date,
                plan.start_date + Duration::days(i64::from(day.day_number) - 1)
            );
        }
    }

    #[test]
    fn marking_a_missing_day_fails() {
        let mut plan = test_plan(1, 6, 3);
        let err = mark_day_complete(&mut plan, 4, Utc::now()).unwrap_err();
        assert_eq!(err, PlanError::DayNotFound(4));
    }

    #[test]
    fn completing_every_day_flips_the_status() {
        let mut plan = test_plan(1, 6, 3);
        mark_day_complete(&mut plan, 1, Utc::now()).unwrap();
        mark_day_complete(&mut plan, 2, Utc::now()).unwrap();
        assert_eq!(plan.status, PlanStatus::Active);
        mark_day_complete(&mut plan, 3, Utc::now()).unwrap();
        assert_eq!(plan.status, PlanStatus::Completed);
    }

    #[test]
    fn remarking_a_complete_day_keeps_it_complete() {
        let mut plan = test_plan(1, 6, 3);
        let first = Utc::now();
        mark_day_complete(&mut plan, 1, first).unwrap();
        let second = first + Duration::seconds(30);
        mark_day_complete(&mut plan, 1, second).unwrap();
        assert!(plan.days[0].is_completed);
        assert_eq!(plan.days[0].completed_at, Some(second));
    }

    #[test]
    fn progress_reports_both_percentages_rounded() {
        // 7 chapters over 3 days: sizes 3, 2, 2.
        let mut plan = test_plan(1, 7, 3);
        mark_day_complete(&mut plan, 1, Utc::now()).unwrap();
        let p = progress(&plan);
        assert_eq!(p.completed_days, 1);
        assert_eq!(p.total_days, 3);
        assert_eq!(p.day_percent, 33.33);
        // 3 of 7 chapters.
        assert_eq!(p.chapter_percent, 42.86);
        assert_eq!(p.status, PlanStatus::Active);
    }

    #[test]
    fn progress_of_a_finished_plan_is_100() {
        let mut plan = test_plan(1, 4, 2);
        mark_day_complete(&mut plan, 1, Utc::now()).unwrap();
        mark_day_complete(&mut plan, 2, Utc::now()).unwrap();
        let p = progress(&plan);
        assert_eq!(p.day_percent, 100.0);
        assert_eq!(p.chapter_percent, 100.0);
        assert_eq!(p.status, PlanStatus::Completed);
    }

    #[test]
    fn visibility_rules() {
        let mut plan = test_plan(1, 4, 2);
        let owner = plan.user_id;
        let stranger = Uuid::new_v4();
        let viewer = Uuid::new_v4();

        assert!(can_view(&plan, owner));
        assert!(can_modify(&plan, owner));
        assert!(!can_view(&plan, stranger));

        plan.shared_with.push(viewer);
        assert!(can_view(&plan, viewer));
        assert!(!can_modify(&plan, viewer));

        plan.is_public = true;
        assert!(can_view(&plan, stranger));
        assert!(!can_modify(&plan, stranger));
    }
}
