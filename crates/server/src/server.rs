use axum::{
    Extension, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{
    ServerError, audit, cash, days, driver_days, drivers, inventory, notifications, sales,
    settings, transfers,
};
use engine::{Actor, Engine, EngineError, Role, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Authenticate the Basic credentials against the users table and attach
/// the caller as an [`Actor`].
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = users::Entity::find_by_id(auth_header.username().to_string())
        .one(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("failed to load user: {err}");
            StatusCode::UNAUTHORIZED
        })?;

    let Some(user) = user.filter(|user| user.password == auth_header.password()) else {
        tracing::debug!(username = auth_header.username(), "rejected credentials");
        return Err(StatusCode::UNAUTHORIZED);
    };
    let role = Role::try_from(user.role.as_str()).map_err(|_| StatusCode::UNAUTHORIZED)?;

    request
        .extensions_mut()
        .insert(Actor::new(user.username, role));
    Ok(next.run(request).await)
}

/// Guard of the owner-only route group.
async fn require_owner(
    Extension(actor): Extension<Actor>,
    request: Request,
    next: Next,
) -> Response {
    if !actor.role.is_owner() {
        tracing::warn!(actor = %actor.id, path = %request.uri().path(), "owner route refused");
        return ServerError::from(EngineError::Forbidden(format!(
            "{} role cannot access this resource",
            actor.role.as_str()
        )))
        .into_response();
    }
    next.run(request).await
}

fn owner_routes() -> Router<ServerState> {
    Router::new()
        .route("/unlock-queue", get(days::unlock_queue))
        .route("/days/{day_id}/unlock-approval", post(days::approve_unlock))
        .route("/drivers", post(drivers::driver_new))
        .route("/drivers/{driver_id}/active", put(drivers::set_active))
        .route("/transfers/{transfer_id}/status", put(transfers::set_status))
        .route("/expenses/{expense_id}/review", put(sales::review_expense))
        .route("/settings/rates", put(settings::update_rates))
        .route("/notifications", get(notifications::list))
        .route("/notifications/{notification_id}/read", post(notifications::mark_read))
        .route("/audit", get(audit::list))
        .route_layer(middleware::from_fn(require_owner))
}

/// Every route of the service. Staff routes accept any authenticated role,
/// the ones under `/admin` need the owner.
pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/days/today", post(days::today))
        .route("/days/current", get(days::current))
        .route("/days/{day_id}", get(days::summary))
        .route("/days/{day_id}/close", post(days::close))
        .route("/days/{day_id}/unlock-request", post(days::request_unlock))
        .route(
            "/days/{day_id}/driver-days",
            get(driver_days::list).post(driver_days::open),
        )
        .route("/driver-days/{driver_day_id}", get(driver_days::get))
        .route("/driver-days/{driver_day_id}/trips", post(driver_days::trip_new))
        .route("/driver-days/{driver_day_id}/return", put(driver_days::update_return))
        .route("/driver-days/{driver_day_id}/cash", put(driver_days::update_cash))
        .route("/driver-days/{driver_day_id}/expenses", put(driver_days::update_expenses))
        .route(
            "/driver-days/{driver_day_id}/supplier-deliveries",
            post(driver_days::supplier_delivery_new),
        )
        .route("/driver-days/{driver_day_id}/recompute", post(driver_days::recompute))
        .route("/trips/{trip_id}/return", post(driver_days::trip_return))
        .route(
            "/days/{day_id}/transfers",
            get(transfers::list).post(transfers::transfer_new),
        )
        .route(
            "/days/{day_id}/office-sales",
            get(sales::office_sales).post(sales::office_sale_new),
        )
        .route(
            "/days/{day_id}/dispenser-deliveries",
            get(sales::dispenser_deliveries).post(sales::dispenser_delivery_new),
        )
        .route(
            "/dispenser-deliveries/{delivery_id}/payments",
            get(sales::dispenser_payments).post(sales::dispenser_payment),
        )
        .route(
            "/days/{day_id}/expenses",
            get(sales::expenses).post(sales::expense_new),
        )
        .route("/days/{day_id}/cash", get(cash::stats))
        .route("/days/{day_id}/cash/closing", post(cash::submit_closing))
        .route(
            "/days/{day_id}/inventory",
            get(inventory::get).put(inventory::update),
        )
        .route("/drivers", get(drivers::list))
        .route("/settings/rates", get(settings::rates))
        .nest("/admin", owner_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, app(state)).await
}
