//! Day lifecycle endpoints.
//!
//! Clients resolve the day once (`POST /days/today`) and address every
//! other call with its id.

use api_types::day::{UnlockApproval, UnlockRequest};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use engine::{Actor, DayRecord, DaySummary, EngineError};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Today's day, opened on first call. Sundays have none.
pub async fn today(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<DayRecord>, ServerError> {
    let now = Utc::now();
    match state.engine.get_or_create_today(&actor, now).await? {
        Some(day) => Ok(Json(day)),
        None => {
            let today = now.with_timezone(&state.engine.timezone()).date_naive();
            Err(EngineError::NoBusinessDay(today.to_string()).into())
        }
    }
}

pub async fn current(State(state): State<ServerState>) -> Result<Json<DayRecord>, ServerError> {
    state
        .engine
        .current_day()
        .await?
        .map(Json)
        .ok_or_else(|| EngineError::KeyNotFound("day not exists".to_string()).into())
}

pub async fn summary(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<DaySummary>, ServerError> {
    Ok(Json(state.engine.day_summary(day_id, Utc::now()).await?))
}

pub async fn close(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<DayRecord>, ServerError> {
    Ok(Json(
        state.engine.close_day(day_id, &actor, Utc::now()).await?,
    ))
}

pub async fn request_unlock(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<UnlockRequest>,
) -> Result<Json<DayRecord>, ServerError> {
    let day = state
        .engine
        .request_unlock(day_id, &payload.reason, &actor, Utc::now())
        .await?;
    Ok(Json(day))
}

pub async fn approve_unlock(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<UnlockApproval>,
) -> Result<Json<DayRecord>, ServerError> {
    let day = state
        .engine
        .approve_unlock(day_id, payload.minutes, &actor, Utc::now())
        .await?;
    Ok(Json(day))
}

pub async fn unlock_queue(
    State(state): State<ServerState>,
) -> Result<Json<Vec<DayRecord>>, ServerError> {
    Ok(Json(state.engine.unlock_queue(Utc::now()).await?))
}
