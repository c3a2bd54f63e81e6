use api_types::cash::ClosingCash;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use engine::{Actor, CashFigures, CashLedger};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn stats(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<CashFigures>, ServerError> {
    Ok(Json(state.engine.cash_stats(day_id).await?))
}

/// Submit (or resubmit) the physical closing count of the drawer.
pub async fn submit_closing(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<ClosingCash>,
) -> Result<Json<CashLedger>, ServerError> {
    let ledger = state
        .engine
        .submit_closing_cash(day_id, payload.closing_cash_naira, &actor, Utc::now())
        .await?;
    Ok(Json(ledger))
}
