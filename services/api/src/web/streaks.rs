//! services/api/src/web/streaks.rs
//!
//! Axum handler for the reading-streak query. Streaks are written as a side
//! effect of completing plan days; this endpoint only reads.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::port_error_response;
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_read_date: Option<NaiveDate>,
}

/// The caller's consecutive-day reading streak.
#[utoipa::path(
    get,
    path = "/streak",
    responses(
        (status = 200, description = "The caller's streak", body = StreakResponse)
    )
)]
pub async fn get_streak_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let streak = state.db.get_streak(user_id).await.map_err(port_error_response)?;
    Ok(Json(StreakResponse {
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        last_read_date: streak.last_read_date,
    }))
}
