//! services/api/src/web/notes.rs
//!
//! Axum handlers for study-note CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use bible_study_core::domain::Note;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{check_passage, port_error_response};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
    pub content: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub content: String,
}

#[derive(Serialize, ToSchema)]
pub struct NoteResponse {
    pub id: Uuid,
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteResponse {
    fn from_domain(note: Note) -> Self {
        Self {
            id: note.id,
            book_id: note.book_id,
            chapter: note.chapter,
            verse: note.verse,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Create a note anchored to a passage.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Unknown book, invalid passage, or empty content")
    )
)]
pub async fn create_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    check_passage(&state.bible, &req.book_id, req.chapter, req.verse)?;
    if req.content.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Note content must not be empty".to_string()));
    }
    state.db.get_or_create_user(user_id).await.map_err(port_error_response)?;
    let note = state
        .db
        .create_note(user_id, &req.book_id, req.chapter, req.verse, &req.content)
        .await
        .map_err(port_error_response)?;
    Ok((StatusCode::CREATED, Json(NoteResponse::from_domain(note))))
}

/// List the caller's notes, newest first.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "The caller's notes", body = [NoteResponse])
    )
)]
pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let notes = state.db.list_notes(user_id).await.map_err(port_error_response)?;
    let body: Vec<NoteResponse> = notes.into_iter().map(NoteResponse::from_domain).collect();
    Ok(Json(body))
}

/// Replace a note's content.
#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = NoteResponse),
        (status = 400, description = "Empty content"),
        (status = 404, description = "No such note")
    )
)]
pub async fn update_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(note_id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.content.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Note content must not be empty".to_string()));
    }
    let note = state
        .db
        .update_note(note_id, user_id, &req.content)
        .await
        .map_err(port_error_response)?;
    Ok(Json(NoteResponse::from_domain(note)))
}

/// Delete one of the caller's notes.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "No such note")
    )
)]
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(note_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.db.delete_note(note_id, user_id).await.map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
