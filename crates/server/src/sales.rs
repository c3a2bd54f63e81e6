//! Office sales, dispenser deliveries and drawer expenses.

use api_types::{
    PaymentType as ApiPaymentType,
    expense::{ExpenseNew, ExpenseReview, ReviewOutcome},
    sale::{DispenserDeliveryNew, DispenserPayment, OfficeSaleNew},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    Actor, DispenserDelivery, DispenserDeliveryCmd, DispenserPayment as Payment, Expense,
    ExpenseCmd, OfficeSale, OfficeSaleCmd, PaymentType, ReviewStatus,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_payment_type(payment_type: ApiPaymentType) -> PaymentType {
    match payment_type {
        ApiPaymentType::Cash => PaymentType::Cash,
        ApiPaymentType::Transfer => PaymentType::Transfer,
    }
}

pub async fn office_sale_new(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<OfficeSaleNew>,
) -> Result<(StatusCode, Json<OfficeSale>), ServerError> {
    let cmd = OfficeSaleCmd {
        day_id,
        customer_name: payload.customer_name,
        bags: payload.bags,
        price_per_bag: payload.price_per_bag,
        payment_type: map_payment_type(payload.payment_type),
    };
    let sale = state.engine.add_office_sale(cmd, &actor, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn office_sales(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<Vec<OfficeSale>>, ServerError> {
    Ok(Json(state.engine.office_sales(day_id).await?))
}

pub async fn dispenser_delivery_new(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<DispenserDeliveryNew>,
) -> Result<(StatusCode, Json<DispenserDelivery>), ServerError> {
    let cmd = DispenserDeliveryCmd {
        day_id,
        customer_name: payload.customer_name,
        bottles: payload.bottles,
        amount_naira: payload.amount_naira,
    };
    let delivery = state
        .engine
        .add_dispenser_delivery(cmd, &actor, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(delivery)))
}

pub async fn dispenser_deliveries(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<Vec<DispenserDelivery>>, ServerError> {
    Ok(Json(state.engine.dispenser_deliveries(day_id).await?))
}

pub async fn dispenser_payments(
    State(state): State<ServerState>,
    Path(delivery_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, ServerError> {
    Ok(Json(state.engine.dispenser_payments(delivery_id).await?))
}

pub async fn dispenser_payment(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(delivery_id): Path<Uuid>,
    Json(payload): Json<DispenserPayment>,
) -> Result<Json<DispenserDelivery>, ServerError> {
    let delivery = state
        .engine
        .record_dispenser_payment(
            delivery_id,
            payload.amount_naira,
            map_payment_type(payload.method),
            &actor,
            Utc::now(),
        )
        .await?;
    Ok(Json(delivery))
}

pub async fn expense_new(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<Expense>), ServerError> {
    let cmd = ExpenseCmd {
        day_id,
        category: payload.category,
        description: payload.description,
        amount_naira: payload.amount_naira,
    };
    let expense = state.engine.add_expense(cmd, &actor, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn expenses(
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    Ok(Json(state.engine.expenses(day_id).await?))
}

pub async fn review_expense(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseReview>,
) -> Result<Json<Expense>, ServerError> {
    let status = match payload.status {
        ReviewOutcome::Approved => ReviewStatus::Approved,
        ReviewOutcome::Queried => ReviewStatus::Queried,
    };
    let expense = state
        .engine
        .review_expense(
            expense_id,
            status,
            payload.note.as_deref(),
            &actor,
            Utc::now(),
        )
        .await?;
    Ok(Json(expense))
}
