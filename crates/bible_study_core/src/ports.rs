//! crates/bible_study_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Bookmark, Collection, Highlight, Note, ReadingPlan, ReadingStreak, ScriptureRef, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A guarded write observed a version other than the expected one.
    #[error("Version conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User>;

    // --- Reading Plans ---
    async fn create_plan(&self, plan: &ReadingPlan) -> PortResult<()>;

    async fn get_plan_by_id(&self, plan_id: Uuid) -> PortResult<ReadingPlan>;

    /// Plans the user owns, plus public plans and plans shared with them.
    async fn list_plans_visible_to(&self, user_id: Uuid) -> PortResult<Vec<ReadingPlan>>;

    /// Writes the plan's mutable state guarded by `expected_version`;
    /// the stored version advances by one. Fails with `Conflict` when the
    /// stored version no longer matches.
    async fn save_plan(&self, plan: &ReadingPlan, expected_version: i32) -> PortResult<()>;

    async fn delete_plan(&self, plan_id: Uuid) -> PortResult<()>;

    // --- Bookmarks ---
    async fn create_bookmark(
        &self,
        user_id: Uuid,
        book_id: &str,
        chapter: u32,
        verse: Option<u32>,
    ) -> PortResult<Bookmark>;

    async fn list_bookmarks(&self, user_id: Uuid) -> PortResult<Vec<Bookmark>>;

    async fn delete_bookmark(&self, bookmark_id: Uuid, user_id: Uuid) -> PortResult<()>;

    // --- Notes ---
    async fn create_note(
        &self,
        user_id: Uuid,
        book_id: &str,
        chapter: u32,
        verse: Option<u32>,
        content: &str,
    ) -> PortResult<Note>;

    async fn list_notes(&self, user_id: Uuid) -> PortResult<Vec<Note>>;

    async fn update_note(&self, note_id: Uuid, user_id: Uuid, content: &str) -> PortResult<Note>;

    async fn delete_note(&self, note_id: Uuid, user_id: Uuid) -> PortResult<()>;

    // --- Highlights ---
    async fn create_highlight(
        &self,
        user_id: Uuid,
        book_id: &str,
        chapter: u32,
        verse_start: u32,
        verse_end: u32,
        color: &str,
    ) -> PortResult<Highlight>;

    async fn list_highlights(&self, user_id: Uuid) -> PortResult<Vec<Highlight>>;

    async fn delete_highlight(&self, highlight_id: Uuid, user_id: Uuid) -> PortResult<()>;

    // --- Topical Collections ---
    async fn create_collection(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> PortResult<Collection>;

    async fn list_collections(&self, user_id: Uuid) -> PortResult<Vec<Collection>>;

    async fn get_collection(&self, collection_id: Uuid, user_id: Uuid) -> PortResult<Collection>;

    async fn add_collection_ref(
        &self,
        collection_id: Uuid,
        user_id: Uuid,
        scripture_ref: &ScriptureRef,
    ) -> PortResult<Collection>;

    async fn remove_collection_ref(
        &self,
        collection_id: Uuid,
        user_id: Uuid,
        scripture_ref: &ScriptureRef,
    ) -> PortResult<Collection>;

    async fn delete_collection(&self, collection_id: Uuid, user_id: Uuid) -> PortResult<()>;

    // --- Reading Streaks ---
    /// Returns the user's streak, or a zeroed streak if none is recorded.
    async fn get_streak(&self, user_id: Uuid) -> PortResult<ReadingStreak>;

    async fn save_streak(&self, streak: &ReadingStreak) -> PortResult<()>;
}
