use api_types::{
    Created,
    driver::{DriverActive, DriverList, DriverNew},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Actor, Driver};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DriverList>,
) -> Result<Json<Vec<Driver>>, ServerError> {
    let active_only = query.active_only.unwrap_or(true);
    Ok(Json(state.engine.drivers(active_only).await?))
}

pub async fn driver_new(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<DriverNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let driver = state
        .engine
        .new_driver(
            &payload.name,
            payload.motor_boy_name.as_deref(),
            &actor,
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id: driver.id })))
}

pub async fn set_active(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
    Json(payload): Json<DriverActive>,
) -> Result<Json<Driver>, ServerError> {
    let driver = state
        .engine
        .set_driver_active(driver_id, payload.active, &actor, Utc::now())
        .await?;
    Ok(Json(driver))
}
