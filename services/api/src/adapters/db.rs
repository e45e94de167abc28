//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! A reading plan is stored as a single row with its days in one JSONB
//! column, so every plan mutation is one atomic row update guarded by the
//! `version` column.

use async_trait::async_trait;
use bible_study_core::domain::{
    Bookmark, Collection, DailyReading, Highlight, Note, PlanStatus, ReadingPlan, ReadingStreak,
    ReadingUnit, ScriptureRef, User,
};
use bible_study_core::ports::{DatabaseService, PortError, PortResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn status_to_str(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::Active => "active",
        PlanStatus::Completed => "completed",
    }
}

fn status_from_str(s: &str) -> PortResult<PlanStatus> {
    match s {
        "active" => Ok(PlanStatus::Active),
        "completed" => Ok(PlanStatus::Completed),
        other => Err(PortError::Unexpected(format!(
            "Unknown plan status in storage: {other}"
        ))),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

/// JSONB payload for one reading unit inside a plan day.
#[derive(Serialize, Deserialize)]
struct ReadingUnitRecord {
    book_id: String,
    start_chapter: u32,
    end_chapter: u32,
}

impl ReadingUnitRecord {
    fn from_domain(unit: &ReadingUnit) -> Self {
        Self {
            book_id: unit.book_id.clone(),
            start_chapter: unit.start_chapter,
            end_chapter: unit.end_chapter,
        }
    }

    fn to_domain(self) -> ReadingUnit {
        ReadingUnit {
            book_id: self.book_id,
            start_chapter: self.start_chapter,
            end_chapter: self.end_chapter,
        }
    }
}

/// JSONB payload for one plan day.
#[derive(Serialize, Deserialize)]
struct DailyReadingRecord {
    day_number: u32,
    date: NaiveDate,
    readings: Vec<ReadingUnitRecord>,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl DailyReadingRecord {
    fn from_domain(day: &DailyReading) -> Self {
        Self {
            day_number: day.day_number,
            date: day.date,
            readings: day.readings.iter().map(ReadingUnitRecord::from_domain).collect(),
            is_completed: day.is_completed,
            completed_at: day.completed_at,
        }
    }

    fn to_domain(self) -> DailyReading {
        DailyReading {
            day_number: self.day_number,
            date: self.date,
            readings: self.readings.into_iter().map(ReadingUnitRecord::to_domain).collect(),
            is_completed: self.is_completed,
            completed_at: self.completed_at,
        }
    }
}

#[derive(FromRow)]
struct PlanRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    start_book: String,
    start_chapter: i32,
    end_book: String,
    end_chapter: i32,
    start_date: NaiveDate,
    duration_in_days: i32,
    days: Json<Vec<DailyReadingRecord>>,
    status: String,
    is_public: bool,
    shared_with: Vec<Uuid>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlanRecord {
    fn to_domain(self) -> PortResult<ReadingPlan> {
        let status = status_from_str(&self.status)?;
        Ok(ReadingPlan {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            start_book: self.start_book,
            start_chapter: self.start_chapter as u32,
            end_book: self.end_book,
            end_chapter: self.end_chapter as u32,
            start_date: self.start_date,
            duration_in_days: self.duration_in_days as u32,
            days: self.days.0.into_iter().map(DailyReadingRecord::to_domain).collect(),
            status,
            is_public: self.is_public,
            shared_with: self.shared_with,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct BookmarkRecord {
    id: Uuid,
    user_id: Uuid,
    book_id: String,
    chapter: i32,
    verse: Option<i32>,
    created_at: DateTime<Utc>,
}
impl BookmarkRecord {
    fn to_domain(self) -> Bookmark {
        Bookmark {
            id: self.id,
            user_id: self.user_id,
            book_id: self.book_id,
            chapter: self.chapter as u32,
            verse: self.verse.map(|v| v as u32),
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct NoteRecord {
    id: Uuid,
    user_id: Uuid,
    book_id: String,
    chapter: i32,
    verse: Option<i32>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            user_id: self.user_id,
            book_id: self.book_id,
            chapter: self.chapter as u32,
            verse: self.verse.map(|v| v as u32),
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct HighlightRecord {
    id: Uuid,
    user_id: Uuid,
    book_id: String,
    chapter: i32,
    verse_start: i32,
    verse_end: i32,
    color: String,
    created_at: DateTime<Utc>,
}
impl HighlightRecord {
    fn to_domain(self) -> Highlight {
        Highlight {
            id: self.id,
            user_id: self.user_id,
            book_id: self.book_id,
            chapter: self.chapter as u32,
            verse_start: self.verse_start as u32,
            verse_end: self.verse_end as u32,
            color: self.color,
            created_at: self.created_at,
        }
    }
}

/// JSONB payload for one scripture reference inside a collection.
#[derive(Serialize, Deserialize)]
struct ScriptureRefRecord {
    book_id: String,
    chapter: u32,
    verse: Option<u32>,
}

impl ScriptureRefRecord {
    fn from_domain(r: &ScriptureRef) -> Self {
        Self {
            book_id: r.book_id.clone(),
            chapter: r.chapter,
            verse: r.verse,
        }
    }

    fn to_domain(self) -> ScriptureRef {
        ScriptureRef {
            book_id: self.book_id,
            chapter: self.chapter,
            verse: self.verse,
        }
    }
}

#[derive(FromRow)]
struct CollectionRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    refs: Json<Vec<ScriptureRefRecord>>,
    created_at: DateTime<Utc>,
}
impl CollectionRecord {
    fn to_domain(self) -> Collection {
        Collection {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            refs: self.refs.0.into_iter().map(ScriptureRefRecord::to_domain).collect(),
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct StreakRecord {
    user_id: Uuid,
    current_streak: i32,
    longest_streak: i32,
    last_read_date: Option<NaiveDate>,
}
impl StreakRecord {
    fn to_domain(self) -> ReadingStreak {
        ReadingStreak {
            user_id: self.user_id,
            current_streak: self.current_streak as u32,
            longest_streak: self.longest_streak as u32,
            last_read_date: self.last_read_date,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User> {
        sqlx::query("INSERT INTO users (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, email FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;

        Ok(record.to_domain())
    }

    async fn create_plan(&self, plan: &ReadingPlan) -> PortResult<()> {
        let days: Vec<DailyReadingRecord> =
            plan.days.iter().map(DailyReadingRecord::from_domain).collect();
        sqlx::query(
            "INSERT INTO plans (id, user_id, name, start_book, start_chapter, end_book, \
             end_chapter, start_date, duration_in_days, days, status, is_public, shared_with, \
             version, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(plan.id)
        .bind(plan.user_id)
        .bind(&plan.name)
        .bind(&plan.start_book)
        .bind(plan.start_chapter as i32)
        .bind(&plan.end_book)
        .bind(plan.end_chapter as i32)
        .bind(plan.start_date)
        .bind(plan.duration_in_days as i32)
        .bind(Json(days))
        .bind(status_to_str(plan.status))
        .bind(plan.is_public)
        .bind(&plan.shared_with)
        .bind(plan.version)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_plan_by_id(&self, plan_id: Uuid) -> PortResult<ReadingPlan> {
        let record = sqlx::query_as::<_, PlanRecord>("SELECT * FROM plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound(format!("Plan {} not found", plan_id)))?;
        record.to_domain()
    }

    async fn list_plans_visible_to(&self, user_id: Uuid) -> PortResult<Vec<ReadingPlan>> {
        let records = sqlx::query_as::<_, PlanRecord>(
            "SELECT * FROM plans \
             WHERE user_id = $1 OR is_public OR $1 = ANY(shared_with) \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(PlanRecord::to_domain).collect()
    }

    async fn save_plan(&self, plan: &ReadingPlan, expected_version: i32) -> PortResult<()> {
        let days: Vec<DailyReadingRecord> =
            plan.days.iter().map(DailyReadingRecord::from_domain).collect();
        let result = sqlx::query(
            "UPDATE plans SET name = $1, days = $2, status = $3, is_public = $4, \
             shared_with = $5, version = version + 1, updated_at = NOW() \
             WHERE id = $6 AND version = $7",
        )
        .bind(&plan.name)
        .bind(Json(days))
        .bind(status_to_str(plan.status))
        .bind(plan.is_public)
        .bind(&plan.shared_with)
        .bind(plan.id)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            // Distinguish a stale version from a vanished plan.
            let exists = sqlx::query("SELECT 1 FROM plans WHERE id = $1")
                .bind(plan.id)
                .fetch_optional(&self.pool)
                .await
                .map_err(unexpected)?
                .is_some();
            return if exists {
                Err(PortError::Conflict(format!(
                    "Plan {} was modified concurrently (expected version {})",
                    plan.id, expected_version
                )))
            } else {
                Err(PortError::NotFound(format!("Plan {} not found", plan.id)))
            };
        }
        Ok(())
    }

    async fn delete_plan(&self, plan_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(plan_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Plan {} not found", plan_id)));
        }
        Ok(())
    }

    async fn create_bookmark(
        &self,
        user_id: Uuid,
        book_id: &str,
        chapter: u32,
        verse: Option<u32>,
    ) -> PortResult<Bookmark> {
        let record = sqlx::query_as::<_, BookmarkRecord>(
            "INSERT INTO bookmarks (id, user_id, book_id, chapter, verse) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, book_id, chapter, verse, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(chapter as i32)
        .bind(verse.map(|v| v as i32))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_bookmarks(&self, user_id: Uuid) -> PortResult<Vec<Bookmark>> {
        let records = sqlx::query_as::<_, BookmarkRecord>(
            "SELECT id, user_id, book_id, chapter, verse, created_at \
             FROM bookmarks WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(BookmarkRecord::to_domain).collect())
    }

    async fn delete_bookmark(&self, bookmark_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1 AND user_id = $2")
            .bind(bookmark_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Bookmark {} not found",
                bookmark_id
            )));
        }
        Ok(())
    }

    async fn create_note(
        &self,
        user_id: Uuid,
        book_id: &str,
        chapter: u32,
        verse: Option<u32>,
        content: &str,
    ) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(
            "INSERT INTO notes (id, user_id, book_id, chapter, verse, content) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, book_id, chapter, verse, content, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(chapter as i32)
        .bind(verse.map(|v| v as i32))
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_notes(&self, user_id: Uuid) -> PortResult<Vec<Note>> {
        let records = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, user_id, book_id, chapter, verse, content, created_at, updated_at \
             FROM notes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(NoteRecord::to_domain).collect())
    }

    async fn update_note(&self, note_id: Uuid, user_id: Uuid, content: &str) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(
            "UPDATE notes SET content = $1, updated_at = NOW() \
             WHERE id = $2 AND user_id = $3 \
             RETURNING id, user_id, book_id, chapter, verse, content, created_at, updated_at",
        )
        .bind(content)
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Note {} not found", note_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_note(&self, note_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Note {} not found", note_id)));
        }
        Ok(())
    }

    async fn create_highlight(
        &self,
        user_id: Uuid,
        book_id: &str,
        chapter: u32,
        verse_start: u32,
        verse_end: u32,
        color: &str,
    ) -> PortResult<Highlight> {
        let record = sqlx::query_as::<_, HighlightRecord>(
            "INSERT INTO highlights (id, user_id, book_id, chapter, verse_start, verse_end, color) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, book_id, chapter, verse_start, verse_end, color, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(chapter as i32)
        .bind(verse_start as i32)
        .bind(verse_end as i32)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_highlights(&self, user_id: Uuid) -> PortResult<Vec<Highlight>> {
        let records = sqlx::query_as::<_, HighlightRecord>(
            "SELECT id, user_id, book_id, chapter, verse_start, verse_end, color, created_at \
             FROM highlights WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(HighlightRecord::to_domain).collect())
    }

    async fn delete_highlight(&self, highlight_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM highlights WHERE id = $1 AND user_id = $2")
            .bind(highlight_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Highlight {} not found",
                highlight_id
            )));
        }
        Ok(())
    }

    async fn create_collection(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> PortResult<Collection> {
        let record = sqlx::query_as::<_, CollectionRecord>(
            "INSERT INTO collections (id, user_id, name, description, refs) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, name, description, refs, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(Json(Vec::<ScriptureRefRecord>::new()))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_collections(&self, user_id: Uuid) -> PortResult<Vec<Collection>> {
        let records = sqlx::query_as::<_, CollectionRecord>(
            "SELECT id, user_id, name, description, refs, created_at \
             FROM collections WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(CollectionRecord::to_domain).collect())
    }

    async fn get_collection(&self, collection_id: Uuid, user_id: Uuid) -> PortResult<Collection> {
        let record = sqlx::query_as::<_, CollectionRecord>(
            "SELECT id, user_id, name, description, refs, created_at \
             FROM collections WHERE id = $1 AND user_id = $2",
        )
        .bind(collection_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Collection {} not found", collection_id)))?;
        Ok(record.to_domain())
    }

    async fn add_collection_ref(
        &self,
        collection_id: Uuid,
        user_id: Uuid,
        scripture_ref: &ScriptureRef,
    ) -> PortResult<Collection> {
        let mut collection = self.get_collection(collection_id, user_id).await?;
        if !collection.refs.contains(scripture_ref) {
            collection.refs.push(scripture_ref.clone());
            self.write_collection_refs(&collection).await?;
        }
        Ok(collection)
    }

    async fn remove_collection_ref(
        &self,
        collection_id: Uuid,
        user_id: Uuid,
        scripture_ref: &ScriptureRef,
    ) -> PortResult<Collection> {
        let mut collection = self.get_collection(collection_id, user_id).await?;
        let before = collection.refs.len();
        collection.refs.retain(|r| r != scripture_ref);
        if collection.refs.len() != before {
            self.write_collection_refs(&collection).await?;
        }
        Ok(collection)
    }

    async fn delete_collection(&self, collection_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1 AND user_id = $2")
            .bind(collection_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Collection {} not found",
                collection_id
            )));
        }
        Ok(())
    }

    async fn get_streak(&self, user_id: Uuid) -> PortResult<ReadingStreak> {
        let record = sqlx::query_as::<_, StreakRecord>(
            "SELECT user_id, current_streak, longest_streak, last_read_date \
             FROM streaks WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(match record {
            Some(record) => record.to_domain(),
            None => ReadingStreak {
                user_id,
                current_streak: 0,
                longest_streak: 0,
                last_read_date: None,
            },
        })
    }

    async fn save_streak(&self, streak: &ReadingStreak) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO streaks (user_id, current_streak, longest_streak, last_read_date) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET current_streak = $2, longest_streak = $3, \
             last_read_date = $4",
        )
        .bind(streak.user_id)
        .bind(streak.current_streak as i32)
        .bind(streak.longest_streak as i32)
        .bind(streak.last_read_date)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }
}

impl DbAdapter {
    /// Persists a collection's reference list after an in-memory edit.
    async fn write_collection_refs(&self, collection: &Collection) -> PortResult<()> {
        let refs: Vec<ScriptureRefRecord> =
            collection.refs.iter().map(ScriptureRefRecord::from_domain).collect();
        sqlx::query("UPDATE collections SET refs = $1 WHERE id = $2")
            .bind(Json(refs))
            .bind(collection.id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
