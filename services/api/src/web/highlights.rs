//! services/api/src/web/highlights.rs
//!
//! Axum handlers for verse-span highlights.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use bible_study_core::domain::Highlight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{check_passage, port_error_response};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct CreateHighlightRequest {
    pub book_id: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
    pub color: String,
}

#[derive(Serialize, ToSchema)]
pub struct HighlightResponse {
    pub id: Uuid,
    pub book_id: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl HighlightResponse {
    fn from_domain(highlight: Highlight) -> Self {
        Self {
            id: highlight.id,
            book_id: highlight.book_id,
            chapter: highlight.chapter,
            verse_start: highlight.verse_start,
            verse_end: highlight.verse_end,
            color: highlight.color,
            created_at: highlight.created_at,
        }
    }
}

/// Highlight a span of verses within one chapter.
#[utoipa::path(
    post,
    path = "/highlights",
    request_body = CreateHighlightRequest,
    responses(
        (status = 201, description = "Highlight created", body = HighlightResponse),
        (status = 400, description = "Unknown book or invalid span")
    )
)]
pub async fn create_highlight_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateHighlightRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    check_passage(&state.bible, &req.book_id, req.chapter, Some(req.verse_start))?;
    if req.verse_end < req.verse_start {
        return Err((
            StatusCode::BAD_REQUEST,
            "verse_end must not precede verse_start".to_string(),
        ));
    }
    if req.color.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Color must not be empty".to_string()));
    }
    state.db.get_or_create_user(user_id).await.map_err(port_error_response)?;
    let highlight = state
        .db
        .create_highlight(
            user_id,
            &req.book_id,
            req.chapter,
            req.verse_start,
            req.verse_end,
            &req.color,
        )
        .await
        .map_err(port_error_response)?;
    Ok((StatusCode::CREATED, Json(HighlightResponse::from_domain(highlight))))
}

/// List the caller's highlights, newest first.
#[utoipa::path(
    get,
    path = "/highlights",
    responses(
        (status = 200, description = "The caller's highlights", body = [HighlightResponse])
    )
)]
pub async fn list_highlights_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let highlights = state.db.list_highlights(user_id).await.map_err(port_error_response)?;
    let body: Vec<HighlightResponse> =
        highlights.into_iter().map(HighlightResponse::from_domain).collect();
    Ok(Json(body))
}

/// Delete one of the caller's highlights.
#[utoipa::path(
    delete,
    path = "/highlights/{id}",
    params(("id" = Uuid, Path, description = "Highlight id")),
    responses(
        (status = 204, description = "Highlight deleted"),
        (status = 404, description = "No such highlight")
    )
)]
pub async fn delete_highlight_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(highlight_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .db
        .delete_highlight(highlight_id, user_id)
        .await
        .map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
