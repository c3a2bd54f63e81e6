use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use engine::{Actor, Engine, Role};
use migration::MigratorTrait;
use server::ServerState;

const OWNER: (&str, &str) = ("boss", "owner-pass");
const STAFF: (&str, &str) = ("ada", "staff-pass");

struct Harness {
    app: Router,
    engine: Arc<Engine>,
}

async fn harness() -> Harness {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    for (username, password, role) in [
        (OWNER.0, OWNER.1, "owner"),
        (STAFF.0, STAFF.1, "staff"),
    ] {
        db.execute(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "INSERT INTO users (username, password, role) VALUES (?, ?, ?)",
            vec![username.into(), password.into(), role.into()],
        ))
        .await
        .unwrap();
    }

    let engine = Arc::new(
        Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap(),
    );
    let app = server::app(ServerState {
        engine: engine.clone(),
        db,
    });
    Harness { app, engine }
}

/// Open a Monday directly through the engine so the tests do not depend on
/// the weekday they run on.
async fn monday(engine: &Engine) -> Uuid {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    engine
        .get_or_create_today(&Actor::new(STAFF.0, Role::Staff), now)
        .await
        .unwrap()
        .unwrap()
        .id
}

fn request(method: &str, uri: &str, user: (&str, &str), body: Option<Value>) -> Request<Body> {
    let credentials = STANDARD.encode(format!("{}:{}", user.0, user.1));
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Basic {credentials}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn new_driver(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/admin/drivers",
            OWNER,
            Some(json!({ "name": name, "motor_boy_name": "Sule" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let h = harness().await;
    let (status, _) = send(
        &h.app,
        request("GET", "/settings/rates", (STAFF.0, "nope"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_cannot_reach_owner_routes() {
    let h = harness().await;
    let (status, body) = send(
        &h.app,
        request(
            "PUT",
            "/admin/settings/rates",
            STAFF,
            Some(json!({
                "retail_price_per_bag": 400,
                "driver_commission_per_bag": 6,
                "motor_boy_commission_per_bag": 4
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().starts_with("unauthorized: "));

    let (status, _) = send(&h.app, request("GET", "/admin/audit", STAFF, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_updates_rates() {
    let h = harness().await;
    let (status, body) = send(&h.app, request("GET", "/settings/rates", STAFF, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["retail_price_per_bag"], 350);

    let (status, _) = send(
        &h.app,
        request(
            "PUT",
            "/admin/settings/rates",
            OWNER,
            Some(json!({
                "retail_price_per_bag": 400,
                "driver_commission_per_bag": 6,
                "motor_boy_commission_per_bag": 4
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&h.app, request("GET", "/settings/rates", STAFF, None)).await;
    assert_eq!(body["retail_price_per_bag"], 400);
    assert_eq!(body["motor_boy_commission_per_bag"], 4);

    let (status, body) = send(
        &h.app,
        request("GET", "/admin/audit?entity_type=company_settings", OWNER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn driver_day_round_trip_over_http() {
    let h = harness().await;
    let day_id = monday(&h.engine).await;
    let driver_id = new_driver(&h.app, "Musa").await;

    let (status, driver_day) = send(
        &h.app,
        request(
            "POST",
            &format!("/days/{day_id}/driver-days"),
            STAFF,
            Some(json!({ "driver_id": driver_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let driver_day_id = driver_day["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &h.app,
        request(
            "POST",
            &format!("/days/{day_id}/driver-days"),
            STAFF,
            Some(json!({ "driver_id": driver_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for (gate_pass, bags) in [("GP-001", 80), ("GP-002", 70)] {
        let (status, _) = send(
            &h.app,
            request(
                "POST",
                &format!("/driver-days/{driver_day_id}/trips"),
                STAFF,
                Some(json!({ "gate_pass_number": gate_pass, "loaded_bags": bags })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            &format!("/driver-days/{driver_day_id}/trips"),
            STAFF,
            Some(json!({ "gate_pass_number": "GP-001", "loaded_bags": 5 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("GP-001"));

    let (status, body) = send(
        &h.app,
        request(
            "PUT",
            &format!("/driver-days/{driver_day_id}/return"),
            STAFF,
            Some(json!({ "final_return_bags": 10 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_sold_bags"], 140);

    let (status, body) = send(
        &h.app,
        request(
            "PUT",
            &format!("/driver-days/{driver_day_id}/cash"),
            STAFF,
            Some(json!({ "cash_received_naira": 40000 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expected_naira"], 49000);
    assert_eq!(body["outstanding_end_naira"], 7880);

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            &format!("/days/{day_id}/transfers"),
            STAFF,
            Some(json!({
                "amount_naira": 5000,
                "sender_name": "Chidi",
                "reference": null,
                "target": { "kind": "driver_day", "id": driver_day_id }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transfer"]["status"], "PENDING");
    assert_eq!(body["driver_day"]["outstanding_end_naira"], 2880);

    let (status, body) = send(
        &h.app,
        request("GET", &format!("/driver-days/{driver_day_id}"), STAFF, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trips"].as_array().unwrap().len(), 2);
    assert_eq!(body["transfers"].as_array().unwrap().len(), 1);
    assert_eq!(body["driver"]["name"], "Musa");
}

#[tokio::test]
async fn closed_day_refuses_edits_until_unlocked() {
    let h = harness().await;
    let day_id = monday(&h.engine).await;

    let (status, body) = send(
        &h.app,
        request("POST", &format!("/days/{day_id}/close"), STAFF, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CLOSED");

    let expense = json!({ "category": "Fuel", "description": null, "amount_naira": 2000 });
    let (status, body) = send(
        &h.app,
        request(
            "POST",
            &format!("/days/{day_id}/expenses"),
            STAFF,
            Some(expense.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Day 2026-10-19 is closed for editing");

    let (status, _) = send(
        &h.app,
        request(
            "POST",
            &format!("/days/{day_id}/unlock-request"),
            STAFF,
            Some(json!({ "reason": "missed fuel receipt" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, queue) = send(&h.app, request("GET", "/admin/unlock-queue", OWNER, None)).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &h.app,
        request(
            "POST",
            &format!("/admin/days/{day_id}/unlock-approval"),
            OWNER,
            Some(json!({ "minutes": 30 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &h.app,
        request("POST", &format!("/days/{day_id}/expenses"), STAFF, Some(expense)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, notifications) = send(
        &h.app,
        request("GET", "/admin/notifications?unread_only=true", OWNER, None),
    )
    .await;
    assert_eq!(notifications[0]["kind"], "UNLOCK_REQUEST");
}

#[tokio::test]
async fn unknown_driver_day_is_not_found() {
    let h = harness().await;
    let (status, _) = send(
        &h.app,
        request("GET", &format!("/driver-days/{}", Uuid::new_v4()), STAFF, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cash_and_inventory_over_http() {
    let h = harness().await;
    let day_id = monday(&h.engine).await;

    let (status, _) = send(
        &h.app,
        request(
            "POST",
            &format!("/days/{day_id}/office-sales"),
            STAFF,
            Some(json!({
                "customer_name": null,
                "bags": 20,
                "price_per_bag": null,
                "payment_type": "CASH"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, cash) = send(&h.app, request("GET", &format!("/days/{day_id}/cash"), STAFF, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cash["cash_in_naira"], 7000);
    assert_eq!(cash["expected_cash_naira"], 7000);

    let (status, ledger) = send(
        &h.app,
        request(
            "POST",
            &format!("/days/{day_id}/cash/closing"),
            STAFF,
            Some(json!({ "closing_cash_naira": 6500 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger["variance_naira"], -500);

    let (status, _) = send(
        &h.app,
        request("PUT", &format!("/days/{day_id}/inventory"), STAFF, Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, inventory) = send(
        &h.app,
        request(
            "PUT",
            &format!("/days/{day_id}/inventory"),
            STAFF,
            Some(json!({ "produced_bags": 500 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inventory["outgoing_office_sales_bags"], 20);
    assert_eq!(inventory["closing_bags_computed"], 480);
}
