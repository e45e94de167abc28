//! services/api/src/web/collections.rs
//!
//! Axum handlers for topical collections: named lists of scripture
//! references a user curates around a theme.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use bible_study_core::domain::{Collection, ScriptureRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{check_passage, port_error_response};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CollectionRefRequest {
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct ScriptureRefResponse {
    pub book_id: String,
    pub chapter: u32,
    pub verse: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct CollectionResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub refs: Vec<ScriptureRefResponse>,
    pub created_at: DateTime<Utc>,
}

impl CollectionResponse {
    fn from_domain(collection: Collection) -> Self {
        Self {
            id: collection.id,
            name: collection.name,
            description: collection.description,
            refs: collection
                .refs
                .into_iter()
                .map(|r| ScriptureRefResponse {
                    book_id: r.book_id,
                    chapter: r.chapter,
                    verse: r.verse,
                })
                .collect(),
            created_at: collection.created_at,
        }
    }
}

/// Create an empty topical collection.
#[utoipa::path(
    post,
    path = "/collections",
    request_body = CreateCollectionRequest,
    responses(
        (status = 201, description = "Collection created", body = CollectionResponse),
        (status = 400, description = "Empty name")
    )
)]
pub async fn create_collection_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Collection name must not be empty".to_string()));
    }
    state.db.get_or_create_user(user_id).await.map_err(port_error_response)?;
    let collection = state
        .db
        .create_collection(user_id, &req.name, req.description.as_deref())
        .await
        .map_err(port_error_response)?;
    Ok((StatusCode::CREATED, Json(CollectionResponse::from_domain(collection))))
}

/// List the caller's collections, newest first.
#[utoipa::path(
    get,
    path = "/collections",
    responses(
        (status = 200, description = "The caller's collections", body = [CollectionResponse])
    )
)]
pub async fn list_collections_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let collections = state.db.list_collections(user_id).await.map_err(port_error_response)?;
    let body: Vec<CollectionResponse> =
        collections.into_iter().map(CollectionResponse::from_domain).collect();
    Ok(Json(body))
}

/// Fetch one collection.
#[utoipa::path(
    get,
    path = "/collections/{id}",
    params(("id" = Uuid, Path, description = "Collection id")),
    responses(
        (status = 200, description = "The collection", body = CollectionResponse),
        (status = 404, description = "No such collection")
    )
)]
pub async fn get_collection_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(collection_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let collection = state
        .db
        .get_collection(collection_id, user_id)
        .await
        .map_err(port_error_response)?;
    Ok(Json(CollectionResponse::from_domain(collection)))
}

/// Add a scripture reference to a collection. Adding a reference that is
/// already present is a no-op.
#[utoipa::path(
    post,
    path = "/collections/{id}/refs",
    params(("id" = Uuid, Path, description = "Collection id")),
    request_body = CollectionRefRequest,
    responses(
        (status = 200, description = "Updated collection", body = CollectionResponse),
        (status = 400, description = "Unknown book or invalid passage"),
        (status = 404, description = "No such collection")
    )
)]
pub async fn add_collection_ref_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(collection_id): Path<Uuid>,
    Json(req): Json<CollectionRefRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    check_passage(&state.bible, &req.book_id, req.chapter, req.verse)?;
    let scripture_ref = ScriptureRef {
        book_id: req.book_id,
        chapter: req.chapter,
        verse: req.verse,
    };
    let collection = state
        .db
        .add_collection_ref(collection_id, user_id, &scripture_ref)
        .await
        .map_err(port_error_response)?;
    Ok(Json(CollectionResponse::from_domain(collection)))
}

/// Remove a scripture reference from a collection.
#[utoipa::path(
    delete,
    path = "/collections/{id}/refs",
    params(("id" = Uuid, Path, description = "Collection id")),
    request_body = CollectionRefRequest,
    responses(
        (status = 200, description = "Updated collection", body = CollectionResponse),
        (status = 404, description = "No such collection")
    )
)]
pub async fn remove_collection_ref_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(collection_id): Path<Uuid>,
    Json(req): Json<CollectionRefRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let scripture_ref = ScriptureRef {
        book_id: req.book_id,
        chapter: req.chapter,
        verse: req.verse,
    };
    let collection = state
        .db
        .remove_collection_ref(collection_id, user_id, &scripture_ref)
        .await
        .map_err(port_error_response)?;
    Ok(Json(CollectionResponse::from_domain(collection)))
}

/// Delete a collection outright.
#[utoipa::path(
    delete,
    path = "/collections/{id}",
    params(("id" = Uuid, Path, description = "Collection id")),
    responses(
        (status = 204, description = "Collection deleted"),
        (status = 404, description = "No such collection")
    )
)]
pub async fn delete_collection_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(collection_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .db
        .delete_collection(collection_id, user_id)
        .await
        .map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
