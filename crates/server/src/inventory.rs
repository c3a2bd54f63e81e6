use api_types::inventory::InventoryEdit;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use engine::{Actor, InventoryDay, InventoryUpdate};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn get(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<InventoryDay>, ServerError> {
    Ok(Json(state.engine.inventory_day(day_id, Utc::now()).await?))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<InventoryEdit>,
) -> Result<Json<InventoryDay>, ServerError> {
    if payload.produced_bags.is_none()
        && payload.spoilage_bags.is_none()
        && payload.closing_bags_confirmed.is_none()
        && !payload.clear_closing_bags_confirmed
        && payload.notes.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one of produced_bags, spoilage_bags, closing_bags_confirmed or notes"
                .to_string(),
        ));
    }

    let update = InventoryUpdate {
        produced_bags: payload.produced_bags,
        spoilage_bags: payload.spoilage_bags,
        closing_bags_confirmed: payload.closing_bags_confirmed,
        clear_closing_bags_confirmed: payload.clear_closing_bags_confirmed,
        notes: payload.notes,
    };
    let inventory = state
        .engine
        .update_inventory(day_id, update, &actor, Utc::now())
        .await?;
    Ok(Json(inventory))
}
