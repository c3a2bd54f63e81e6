//! Claimed bank transfers.

use api_types::transfer::{
    TransferNew, TransferStatus as ApiStatus, TransferStatusUpdate, TransferTarget as ApiTarget,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Actor, DriverDay, TransferCmd, TransferLog, TransferStatus, TransferTarget};
use serde::Serialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_target(target: ApiTarget) -> TransferTarget {
    match target {
        ApiTarget::DriverDay(id) => TransferTarget::DriverDay(id),
        ApiTarget::OfficeSale(id) => TransferTarget::OfficeSale(id),
        ApiTarget::DispenserDelivery(id) => TransferTarget::DispenserDelivery(id),
        ApiTarget::Unlinked => TransferTarget::Unlinked,
    }
}

fn map_status(status: ApiStatus) -> TransferStatus {
    match status {
        ApiStatus::Pending => TransferStatus::Pending,
        ApiStatus::MatchedAuto => TransferStatus::MatchedAuto,
        ApiStatus::MatchedManual => TransferStatus::MatchedManual,
        ApiStatus::NotFound => TransferStatus::NotFound,
    }
}

#[derive(Serialize)]
pub struct TransferCreated {
    pub transfer: TransferLog,
    /// The linked driver day after its recompute.
    pub driver_day: Option<DriverDay>,
}

pub async fn transfer_new(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<TransferCreated>), ServerError> {
    let mut cmd = TransferCmd::new(day_id, map_target(payload.target), payload.amount_naira);
    if let Some(sender_name) = payload.sender_name {
        cmd = cmd.sender_name(sender_name);
    }
    if let Some(reference) = payload.reference {
        cmd = cmd.reference(reference);
    }
    let (transfer, driver_day) = state.engine.add_transfer(cmd, &actor, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(TransferCreated {
            transfer,
            driver_day,
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<Vec<TransferLog>>, ServerError> {
    Ok(Json(state.engine.transfers(day_id).await?))
}

pub async fn set_status(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(transfer_id): Path<Uuid>,
    Json(payload): Json<TransferStatusUpdate>,
) -> Result<Json<TransferLog>, ServerError> {
    let transfer = state
        .engine
        .set_transfer_status(transfer_id, map_status(payload.status), &actor, Utc::now())
        .await?;
    Ok(Json(transfer))
}
