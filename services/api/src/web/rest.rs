//! services/api/src/web/rest.rs
//!
//! The health endpoint and the master definition for the OpenAPI
//! specification.

use axum::{http::StatusCode, response::IntoResponse};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        crate::web::plans::create_plan_handler,
        crate::web::plans::list_plans_handler,
        crate::web::plans::get_plan_handler,
        crate::web::plans::update_plan_handler,
        crate::web::plans::delete_plan_handler,
        crate::web::plans::complete_day_handler,
        crate::web::plans::plan_progress_handler,
        crate::web::bookmarks::create_bookmark_handler,
        crate::web::bookmarks::list_bookmarks_handler,
        crate::web::bookmarks::delete_bookmark_handler,
        crate::web::notes::create_note_handler,
        crate::web::notes::list_notes_handler,
        crate::web::notes::update_note_handler,
        crate::web::notes::delete_note_handler,
        crate::web::highlights::create_highlight_handler,
        crate::web::highlights::list_highlights_handler,
        crate::web::highlights::delete_highlight_handler,
        crate::web::collections::create_collection_handler,
        crate::web::collections::list_collections_handler,
        crate::web::collections::get_collection_handler,
        crate::web::collections::add_collection_ref_handler,
        crate::web::collections::remove_collection_ref_handler,
        crate::web::collections::delete_collection_handler,
        crate::web::streaks::get_streak_handler,
    ),
    components(
        schemas(
            crate::web::plans::CreatePlanRequest,
            crate::web::plans::UpdatePlanRequest,
            crate::web::plans::PlanResponse,
            crate::web::plans::DailyReadingResponse,
            crate::web::plans::ReadingUnitResponse,
            crate::web::plans::ProgressResponse,
            crate::web::bookmarks::CreateBookmarkRequest,
            crate::web::bookmarks::BookmarkResponse,
            crate::web::notes::CreateNoteRequest,
            crate::web::notes::UpdateNoteRequest,
            crate::web::notes::NoteResponse,
            crate::web::highlights::CreateHighlightRequest,
            crate::web::highlights::HighlightResponse,
            crate::web::collections::CreateCollectionRequest,
            crate::web::collections::CollectionRefRequest,
            crate::web::collections::ScriptureRefResponse,
            crate::web::collections::CollectionResponse,
            crate::web::streaks::StreakResponse,
        )
    ),
    tags(
        (name = "Bible Study API", description = "Personal Bible-study backend: reading plans, bookmarks, notes, highlights, collections, and streaks.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    StatusCode::OK
}
