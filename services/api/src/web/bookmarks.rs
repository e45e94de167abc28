//! services/api/src/web/bookmarks.rs
//!
//! Axum handlers for bookmark CRUD. Bookmarks point at a chapter or a
//! single verse and are always scoped to their owner.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use bible_study_core::domain::Bookmark;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{check_passage, port_error_response};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct CreateBookmarkRequest {
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct BookmarkResponse {
    pub id: Uuid,
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl BookmarkResponse {
    fn from_domain(bookmark: Bookmark) -> Self {
        Self {
            id: bookmark.id,
            book_id: bookmark.book_id,
            chapter: bookmark.chapter,
            verse: bookmark.verse,
            created_at: bookmark.created_at,
        }
    }
}

/// Create a bookmark at a chapter or verse.
#[utoipa::path(
    post,
    path = "/bookmarks",
    request_body = CreateBookmarkRequest,
    responses(
        (status = 201, description = "Bookmark created", body = BookmarkResponse),
        (status = 400, description = "Unknown book or invalid chapter/verse")
    )
)]
pub async fn create_bookmark_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    check_passage(&state.bible, &req.book_id, req.chapter, req.verse)?;
    state.db.get_or_create_user(user_id).await.map_err(port_error_response)?;
    let bookmark = state
        .db
        .create_bookmark(user_id, &req.book_id, req.chapter, req.verse)
        .await
        .map_err(port_error_response)?;
    Ok((StatusCode::CREATED, Json(BookmarkResponse::from_domain(bookmark))))
}

/// List the caller's bookmarks, newest first.
#[utoipa::path(
    get,
    path = "/bookmarks",
    responses(
        (status = 200, description = "The caller's bookmarks", body = [BookmarkResponse])
    )
)]
pub async fn list_bookmarks_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let bookmarks = state.db.list_bookmarks(user_id).await.map_err(port_error_response)?;
    let body: Vec<BookmarkResponse> =
        bookmarks.into_iter().map(BookmarkResponse::from_domain).collect();
    Ok(Json(body))
}

/// Delete one of the caller's bookmarks.
#[utoipa::path(
    delete,
    path = "/bookmarks/{id}",
    params(("id" = Uuid, Path, description = "Bookmark id")),
    responses(
        (status = 204, description = "Bookmark deleted"),
        (status = 404, description = "No such bookmark")
    )
)]
pub async fn delete_bookmark_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(bookmark_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .db
        .delete_bookmark(bookmark_id, user_id)
        .await
        .map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
