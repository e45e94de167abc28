//! crates/bible_study_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// A scripture range as supplied by a caller. `end_chapter` may be omitted,
/// in which case it resolves to the last chapter of `end_book`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptureRange {
    pub start_book: String,
    pub start_chapter: u32,
    pub end_book: String,
    pub end_chapter: Option<u32>,
}

/// A single contiguous reading assignment within one book.
/// Chapters are inclusive; `end_chapter >= start_chapter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingUnit {
    pub book_id: String,
    pub start_chapter: u32,
    pub end_chapter: u32,
}

impl ReadingUnit {
    /// Number of chapters this unit covers.
    pub fn chapter_count(&self) -> u32 {
        self.end_chapter - self.start_chapter + 1
    }
}

/// One day's worth of reading within a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReading {
    /// 1-based, contiguous across the plan.
    pub day_number: u32,
    pub date: NaiveDate,
    /// One or more units; a day may span book boundaries.
    pub readings: Vec<ReadingUnit>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DailyReading {
    pub fn chapter_count(&self) -> u32 {
        self.readings.iter().map(ReadingUnit::chapter_count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    Active,
    Completed,
}

/// The persisted reading-plan aggregate.
#[derive(Debug, Clone)]
pub struct ReadingPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub start_book: String,
    pub start_chapter: u32,
    pub end_book: String,
    pub end_chapter: u32,
    pub start_date: NaiveDate,
    /// Actual number of days in the plan. Equals `days.len()`; may be lower
    /// than the caller's requested duration when the range has fewer
    /// chapters than requested days.
    pub duration_in_days: u32,
    pub days: Vec<DailyReading>,
    pub status: PlanStatus,
    pub is_public: bool,
    pub shared_with: Vec<Uuid>,
    /// Optimistic-concurrency counter, incremented on every mutation.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate completion figures for a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanProgress {
    pub completed_days: u32,
    pub total_days: u32,
    /// completed_days / total_days, as a percentage rounded to 2 decimals.
    pub day_percent: f64,
    /// Chapter-weighted completion, as a percentage rounded to 2 decimals.
    pub chapter_percent: f64,
    pub status: PlanStatus,
}

/// A single verse-or-chapter pointer into scripture. Used by bookmarks,
/// highlights, and collection entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptureRef {
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// A free-text study note anchored to a passage.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A colored verse-span highlight within a single chapter.
#[derive(Debug, Clone)]
pub struct Highlight {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A named topical collection of scripture references.
#[derive(Debug, Clone)]
pub struct Collection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub refs: Vec<ScriptureRef>,
    pub created_at: DateTime<Utc>,
}

/// Per-user consecutive-day reading streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingStreak {
    pub user_id: Uuid,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_read_date: Option<NaiveDate>,
}
