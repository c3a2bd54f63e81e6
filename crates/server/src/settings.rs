use api_types::settings::RatesUpdate;
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::{Actor, Rates};

use crate::{ServerError, server::ServerState};

pub async fn rates(State(state): State<ServerState>) -> Result<Json<Rates>, ServerError> {
    Ok(Json(state.engine.rates().await?))
}

pub async fn update_rates(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<RatesUpdate>,
) -> Result<Json<Rates>, ServerError> {
    let rates = Rates {
        retail_price_per_bag: payload.retail_price_per_bag,
        driver_commission_per_bag: payload.driver_commission_per_bag,
        motor_boy_commission_per_bag: payload.motor_boy_commission_per_bag,
    };
    Ok(Json(
        state.engine.update_rates(rates, &actor, Utc::now()).await?,
    ))
}
