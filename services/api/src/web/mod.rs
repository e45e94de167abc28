//! services/api/src/web/mod.rs
//!
//! Handler modules plus the small helpers they share: port-error mapping
//! and passage validation against the canonical index.

pub mod bookmarks;
pub mod collections;
pub mod highlights;
pub mod middleware;
pub mod notes;
pub mod plans;
pub mod rest;
pub mod state;
pub mod streaks;

use axum::http::StatusCode;
use bible_study_core::bible::BibleIndex;
use bible_study_core::ports::PortError;
use tracing::error;

pub use middleware::require_auth;
pub use rest::health_handler;

/// Maps a port failure to an HTTP response, hiding storage detail on
/// unexpected errors.
pub(crate) fn port_error_response(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::Unexpected(msg) => {
            error!("Storage failure: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Validates a single (book, chapter, verse?) pointer against the index.
pub(crate) fn check_passage(
    index: &BibleIndex,
    book_id: &str,
    chapter: u32,
    verse: Option<u32>,
) -> Result<(), (StatusCode, String)> {
    let chapter_count = index.chapter_count_of(book_id).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Unknown book: {}", book_id),
        )
    })?;
    if chapter < 1 || chapter > chapter_count {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Chapter {} is out of range for {}", chapter, book_id),
        ));
    }
    if verse == Some(0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Verse numbers start at 1".to_string(),
        ));
    }
    Ok(())
}
