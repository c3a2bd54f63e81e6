//! Driver day endpoints: opening, trips, raw inputs and supplier deliveries.

use api_types::driver_day::{
    CashUpdate, DriverDayOpen, ExpensesUpdate, ReturnUpdate, SupplierDeliveryNew, TripNew,
    TripReturn,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Actor, DriverDay, DriverDayDetail, SupplierDeliveryCmd, Trip, TripCmd};
use serde::Serialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// A child row together with its freshly recomputed driver day.
#[derive(Serialize)]
pub struct WithDriverDay<T> {
    pub created: T,
    pub driver_day: DriverDay,
}

pub async fn open(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<DriverDayOpen>,
) -> Result<(StatusCode, Json<DriverDay>), ServerError> {
    let driver_day = state
        .engine
        .open_driver_day(day_id, payload.driver_id, &actor, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(driver_day)))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<Vec<DriverDay>>, ServerError> {
    Ok(Json(state.engine.driver_days(day_id).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(driver_day_id): Path<Uuid>,
) -> Result<Json<DriverDayDetail>, ServerError> {
    Ok(Json(state.engine.driver_day(driver_day_id).await?))
}

pub async fn trip_new(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(driver_day_id): Path<Uuid>,
    Json(payload): Json<TripNew>,
) -> Result<(StatusCode, Json<WithDriverDay<Trip>>), ServerError> {
    let mut cmd = TripCmd::new(driver_day_id, payload.gate_pass_number, payload.loaded_bags);
    if let Some(depart_time) = payload.depart_time {
        cmd = cmd.depart_time(depart_time.with_timezone(&Utc));
    }
    let (created, driver_day) = state.engine.add_trip(cmd, &actor, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(WithDriverDay {
            created,
            driver_day,
        }),
    ))
}

pub async fn trip_return(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<TripReturn>,
) -> Result<Json<Trip>, ServerError> {
    let trip = state
        .engine
        .record_trip_return(
            trip_id,
            payload.return_time.with_timezone(&Utc),
            &actor,
            Utc::now(),
        )
        .await?;
    Ok(Json(trip))
}

pub async fn update_return(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(driver_day_id): Path<Uuid>,
    Json(payload): Json<ReturnUpdate>,
) -> Result<Json<DriverDay>, ServerError> {
    let driver_day = state
        .engine
        .update_return(driver_day_id, payload.final_return_bags, &actor, Utc::now())
        .await?;
    Ok(Json(driver_day))
}

pub async fn update_cash(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(driver_day_id): Path<Uuid>,
    Json(payload): Json<CashUpdate>,
) -> Result<Json<DriverDay>, ServerError> {
    let driver_day = state
        .engine
        .update_cash(driver_day_id, payload.cash_received_naira, &actor, Utc::now())
        .await?;
    Ok(Json(driver_day))
}

pub async fn update_expenses(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(driver_day_id): Path<Uuid>,
    Json(payload): Json<ExpensesUpdate>,
) -> Result<Json<DriverDay>, ServerError> {
    let driver_day = state
        .engine
        .update_expenses(driver_day_id, payload.expenses_naira, &actor, Utc::now())
        .await?;
    Ok(Json(driver_day))
}

pub async fn supplier_delivery_new(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(driver_day_id): Path<Uuid>,
    Json(payload): Json<SupplierDeliveryNew>,
) -> Result<(StatusCode, Json<WithDriverDay<engine::SupplierDelivery>>), ServerError> {
    let cmd = SupplierDeliveryCmd {
        driver_day_id,
        supplier_name: payload.supplier_name,
        bags: payload.bags,
        price_per_bag: payload.price_per_bag,
    };
    let (created, driver_day) = state
        .engine
        .add_supplier_delivery(cmd, &actor, Utc::now())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(WithDriverDay {
            created,
            driver_day,
        }),
    ))
}

pub async fn recompute(
    State(state): State<ServerState>,
    Path(driver_day_id): Path<Uuid>,
) -> Result<Json<DriverDay>, ServerError> {
    Ok(Json(
        state
            .engine
            .recompute_driver_day(driver_day_id, Utc::now())
            .await?,
    ))
}
