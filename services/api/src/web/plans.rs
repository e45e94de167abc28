//! services/api/src/web/plans.rs
//!
//! Axum handlers for the reading-plan endpoints: creation (range validation
//! plus day distribution), listing, retrieval, settings updates, deletion,
//! day completion, and progress queries.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use bible_study_core::domain::{PlanStatus, ReadingPlan, ScriptureRange};
use bible_study_core::plan::{self, PlanError};
use bible_study_core::{distribute, streak, validate};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreatePlanRequest {
    pub name: String,
    pub start_book: String,
    /// Defaults to chapter 1 of the start book.
    pub start_chapter: Option<u32>,
    pub end_book: String,
    /// Defaults to the last chapter of the end book.
    pub end_chapter: Option<u32>,
    pub start_date: NaiveDate,
    pub duration_in_days: u32,
    pub is_public: Option<bool>,
    pub shared_with: Option<Vec<Uuid>>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    /// `"active"` or `"completed"`.
    pub status: Option<String>,
    pub is_public: Option<bool>,
    /// Expected plan version; a mismatch yields 409. Defaults to the
    /// version read during this request.
    pub version: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
pub struct CompleteDayQuery {
    /// Expected plan version; a mismatch yields 409.
    pub version: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct ReadingUnitResponse {
    pub book_id: String,
    pub start_chapter: u32,
    pub end_chapter: u32,
}

#[derive(Serialize, ToSchema)]
pub struct DailyReadingResponse {
    pub day_number: u32,
    pub date: NaiveDate,
    pub readings: Vec<ReadingUnitResponse>,
    pub is_completed: bool,
    pub completed_at: Option<chrono::DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct PlanResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub start_book: String,
    pub start_chapter: u32,
    pub end_book: String,
    pub end_chapter: u32,
    pub start_date: NaiveDate,
    /// Actual day count; lower than requested when the range has fewer
    /// chapters than requested days.
    pub duration_in_days: u32,
    pub days: Vec<DailyReadingResponse>,
    pub status: String,
    pub is_public: bool,
    pub shared_with: Vec<Uuid>,
    pub version: i32,
}

#[derive(Serialize, ToSchema)]
pub struct ProgressResponse {
    pub completed_days: u32,
    pub total_days: u32,
    pub day_percent: f64,
    pub chapter_percent: f64,
    pub status: String,
}

fn status_label(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::Active => "active",
        PlanStatus::Completed => "completed",
    }
}

impl PlanResponse {
    fn from_domain(plan: &ReadingPlan) -> Self {
        Self {
            id: plan.id,
            user_id: plan.user_id,
            name: plan.name.clone(),
            start_book: plan.start_book.clone(),
            start_chapter: plan.start_chapter,
            end_book: plan.end_book.clone(),
            end_chapter: plan.end_chapter,
            start_date: plan.start_date,
            duration_in_days: plan.duration_in_days,
            days: plan
                .days
                .iter()
                .map(|day| DailyReadingResponse {
                    day_number: day.day_number,
                    date: day.date,
                    readings: day
                        .readings
                        .iter()
                        .map(|unit| ReadingUnitResponse {
                            book_id: unit.book_id.clone(),
                            start_chapter: unit.start_chapter,
                            end_chapter: unit.end_chapter,
                        })
                        .collect(),
                    is_completed: day.is_completed,
                    completed_at: day.completed_at,
                })
                .collect(),
            status: status_label(plan.status).to_string(),
            is_public: plan.is_public,
            shared_with: plan.shared_with.clone(),
            version: plan.version,
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new reading plan.
///
/// Validates the scripture range against the canonical index, distributes
/// the chapters across the requested duration, and persists the plan. When
/// the range has fewer chapters than requested days, the plan is capped at
/// one chapter per day and `duration_in_days` reflects the actual length.
#[utoipa::path(
    post,
    path = "/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created successfully", body = PlanResponse),
        (status = 400, description = "Invalid range or day count"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let range = ScriptureRange {
        start_book: req.start_book,
        start_chapter: req.start_chapter.unwrap_or(1),
        end_book: req.end_book,
        end_chapter: req.end_chapter,
    };
    let normalized =
        validate(&state.bible, &range).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let assignments = distribute(&state.bible, &normalized, req.duration_in_days)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let days = plan::build_days(assignments, req.start_date);
    let now = Utc::now();
    let plan = ReadingPlan {
        id: Uuid::new_v4(),
        user_id,
        name: req.name,
        start_book: normalized.start_book,
        start_chapter: normalized.start_chapter,
        end_book: normalized.end_book,
        end_chapter: normalized.end_chapter,
        start_date: req.start_date,
        duration_in_days: days.len() as u32,
        days,
        status: PlanStatus::Active,
        is_public: req.is_public.unwrap_or(false),
        shared_with: req.shared_with.unwrap_or_default(),
        version: 1,
        created_at: now,
        updated_at: now,
    };

    state.db.get_or_create_user(user_id).await.map_err(port_error_response)?;
    state.db.create_plan(&plan).await.map_err(port_error_response)?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from_domain(&plan))))
}

/// List plans owned by, public, or shared with the caller.
#[utoipa::path(
    get,
    path = "/plans",
    responses(
        (status = 200, description = "Plans visible to the caller", body = [PlanResponse])
    )
)]
pub async fn list_plans_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let plans = state
        .db
        .list_plans_visible_to(user_id)
        .await
        .map_err(port_error_response)?;
    let body: Vec<PlanResponse> = plans.iter().map(PlanResponse::from_domain).collect();
    Ok(Json(body))
}

/// Fetch a single plan.
#[utoipa::path(
    get,
    path = "/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "The plan", body = PlanResponse),
        (status = 403, description = "Caller may not view this plan"),
        (status = 404, description = "No such plan")
    )
)]
pub async fn get_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let plan = state.db.get_plan_by_id(plan_id).await.map_err(port_error_response)?;
    if !plan::can_view(&plan, user_id) {
        return Err((StatusCode::FORBIDDEN, "Access denied".to_string()));
    }
    Ok(Json(PlanResponse::from_domain(&plan)))
}

/// Update a plan's name, status, or visibility. Owner-only; the scripture
/// range and duration are immutable after creation.
#[utoipa::path(
    put,
    path = "/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Updated plan", body = PlanResponse),
        (status = 400, description = "Invalid status value"),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "No such plan"),
        (status = 409, description = "Plan was modified concurrently")
    )
)]
pub async fn update_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(plan_id): Path<Uuid>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut plan = state.db.get_plan_by_id(plan_id).await.map_err(port_error_response)?;
    if !plan::can_modify(&plan, user_id) {
        return Err((StatusCode::FORBIDDEN, "Access denied".to_string()));
    }

    if let Some(name) = req.name {
        plan.name = name;
    }
    if let Some(status) = req.status.as_deref() {
        plan.status = match status {
            "active" => PlanStatus::Active,
            "completed" => PlanStatus::Completed,
            other => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!("'{}' is not a valid plan status", other),
                ))
            }
        };
    }
    if let Some(is_public) = req.is_public {
        plan.is_public = is_public;
    }

    let expected_version = req.version.unwrap_or(plan.version);
    state
        .db
        .save_plan(&plan, expected_version)
        .await
        .map_err(port_error_response)?;
    plan.version = expected_version + 1;

    Ok(Json(PlanResponse::from_domain(&plan)))
}

/// Delete a plan. Owner-only.
#[utoipa::path(
    delete,
    path = "/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 204, description = "Plan deleted"),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "No such plan")
    )
)]
pub async fn delete_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let plan = state.db.get_plan_by_id(plan_id).await.map_err(port_error_response)?;
    if !plan::can_modify(&plan, user_id) {
        return Err((StatusCode::FORBIDDEN, "Access denied".to_string()));
    }
    state.db.delete_plan(plan_id).await.map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark one day of a plan complete. Owner-only.
///
/// Completing the final outstanding day flips the plan to `completed`.
/// Also records reading activity against the caller's streak.
#[utoipa::path(
    post,
    path = "/plans/{id}/days/{day_number}/complete",
    params(
        ("id" = Uuid, Path, description = "Plan id"),
        ("day_number" = u32, Path, description = "1-based day number"),
        CompleteDayQuery
    ),
    responses(
        (status = 200, description = "Updated plan", body = PlanResponse),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "No such plan or day"),
        (status = 409, description = "Plan was modified concurrently")
    )
)]
pub async fn complete_day_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((plan_id, day_number)): Path<(Uuid, u32)>,
    Query(query): Query<CompleteDayQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut plan = state.db.get_plan_by_id(plan_id).await.map_err(port_error_response)?;
    if !plan::can_modify(&plan, user_id) {
        return Err((StatusCode::FORBIDDEN, "Access denied".to_string()));
    }

    let now = Utc::now();
    plan::mark_day_complete(&mut plan, day_number, now).map_err(|e| match e {
        PlanError::DayNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
    })?;

    let expected_version = query.version.unwrap_or(plan.version);
    state
        .db
        .save_plan(&plan, expected_version)
        .await
        .map_err(port_error_response)?;
    plan.version = expected_version + 1;

    // Streak bookkeeping is best-effort; the completion itself is already
    // persisted at this point.
    let streak_update = async {
        let mut user_streak = state.db.get_streak(user_id).await?;
        streak::record_activity(&mut user_streak, now.date_naive());
        state.db.save_streak(&user_streak).await
    }
    .await;
    if let Err(e) = streak_update {
        error!("Failed to update reading streak for {}: {:?}", user_id, e);
    }

    Ok(Json(PlanResponse::from_domain(&plan)))
}

/// Progress figures for a plan: day-based and chapter-weighted percentages.
#[utoipa::path(
    get,
    path = "/plans/{id}/progress",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan progress", body = ProgressResponse),
        (status = 403, description = "Caller may not view this plan"),
        (status = 404, description = "No such plan")
    )
)]
pub async fn plan_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let plan = state.db.get_plan_by_id(plan_id).await.map_err(port_error_response)?;
    if !plan::can_view(&plan, user_id) {
        return Err((StatusCode::FORBIDDEN, "Access denied".to_string()));
    }
    let progress = plan::progress(&plan);
    Ok(Json(ProgressResponse {
        completed_days: progress.completed_days,
        total_days: progress.total_days,
        day_percent: progress.day_percent,
        chapter_percent: progress.chapter_percent,
        status: status_label(progress.status).to_string(),
    }))
}
