use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Actor, AuditFilter, DayRecord, DayStatus, DispenserDeliveryCmd, Driver, DriverDay, Engine,
    EngineError, ExpenseCmd, InventoryUpdate, NotificationKind, OfficeSaleCmd, PaymentType, Rates,
    ReviewStatus, Role, SupplierDeliveryCmd, TransferCmd, TransferStatus, TransferTarget, TripCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Monday morning in Lagos.
fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

fn tuesday() -> DateTime<Utc> {
    monday() + Duration::days(1)
}

fn staff() -> Actor {
    Actor::new("ada", Role::Staff)
}

fn owner() -> Actor {
    Actor::new("boss", Role::Owner)
}

async fn open_day(engine: &Engine, now: DateTime<Utc>) -> DayRecord {
    engine
        .get_or_create_today(&staff(), now)
        .await
        .unwrap()
        .unwrap()
}

async fn driver(engine: &Engine, name: &str) -> Driver {
    engine
        .new_driver(name, Some("Sule"), &owner(), monday())
        .await
        .unwrap()
}

/// Leave the driver owing 1000 at the end of Saturday.
async fn owe_1000_on_saturday(engine: &Engine, driver: &Driver) {
    let saturday = monday() - Duration::days(2);
    let day = open_day(engine, saturday).await;
    let driver_day = engine
        .open_driver_day(day.id, driver.id, &staff(), saturday)
        .await
        .unwrap();
    engine
        .add_trip(TripCmd::new(driver_day.id, "GP-S01", 4), &staff(), saturday)
        .await
        .unwrap();
    // 4 × 350 − 20 − 12 − 368
    let driver_day = engine
        .update_expenses(driver_day.id, 368, &staff(), saturday)
        .await
        .unwrap();
    assert_eq!(driver_day.outstanding_end_naira, 1_000);
}

/// Outstanding 1000 carried in, then two trips totalling 150 bags.
async fn scenario_a(engine: &Engine, day: &DayRecord, driver: &Driver) -> DriverDay {
    let now = monday();
    owe_1000_on_saturday(engine, driver).await;
    let driver_day = engine
        .open_driver_day(day.id, driver.id, &staff(), now)
        .await
        .unwrap();
    engine
        .add_trip(TripCmd::new(driver_day.id, "GP-001", 80), &staff(), now)
        .await
        .unwrap();
    let (_, driver_day) = engine
        .add_trip(TripCmd::new(driver_day.id, "GP-002", 70), &staff(), now)
        .await
        .unwrap();
    driver_day
}

#[tokio::test]
async fn sunday_has_no_business_day() {
    let (engine, _db) = engine_with_db().await;
    let sunday = monday() - Duration::days(1);

    let day = engine.get_or_create_today(&staff(), sunday).await.unwrap();
    assert!(day.is_none());
    assert!(engine.current_day().await.unwrap().is_none());
}

#[tokio::test]
async fn today_is_created_once_per_date() {
    let (engine, _db) = engine_with_db().await;

    let first = open_day(&engine, monday()).await;
    let second = open_day(&engine, monday() + Duration::hours(5)).await;

    assert_eq!(first.id, second.id);
    assert_eq!(first.status, DayStatus::Open);
    assert_eq!(engine.current_day().await.unwrap(), Some(first.clone()));

    let next = open_day(&engine, tuesday()).await;
    assert_ne!(next.id, first.id);
    assert_eq!(engine.current_day().await.unwrap(), Some(next));
}

#[tokio::test]
async fn driver_day_follows_scenarios_a_b_c() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;

    let driver_day = scenario_a(&engine, &day, &musa).await;
    assert_eq!(driver_day.total_trips, 2);
    assert_eq!(driver_day.total_loaded_bags, 150);
    assert_eq!(driver_day.total_sold_bags, 150);
    assert_eq!(driver_day.expected_naira, 52_500);
    assert_eq!(driver_day.driver_commission_naira, 750);
    assert_eq!(driver_day.motor_boy_commission_naira, 450);
    assert_eq!(driver_day.outstanding_start_naira, 1_000);
    assert_eq!(driver_day.outstanding_end_naira, 52_300);

    engine
        .update_return(driver_day.id, 10, &staff(), monday())
        .await
        .unwrap();
    let driver_day = engine
        .update_cash(driver_day.id, 40_000, &staff(), monday())
        .await
        .unwrap();
    assert_eq!(driver_day.total_sold_bags, 140);
    assert_eq!(driver_day.expected_naira, 49_000);
    assert_eq!(driver_day.received_logged_naira, 40_000);
    assert_eq!(driver_day.outstanding_end_naira, 8_880);

    let (delivery, driver_day) = engine
        .add_supplier_delivery(
            SupplierDeliveryCmd {
                driver_day_id: driver_day.id,
                supplier_name: "Depot".to_string(),
                bags: 20,
                price_per_bag: 340,
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();
    assert_eq!(delivery.amount_naira, 6_800);
    assert_eq!(driver_day.supplier_bags, 20);
    assert_eq!(driver_day.normal_bags, 120);
    assert_eq!(driver_day.total_sold_bags, 140);
    assert_eq!(driver_day.expected_naira, 48_800);

    let stored = engine.driver_day(driver_day.id).await.unwrap();
    assert_eq!(stored.driver_day, driver_day);
    assert_eq!(stored.trips.len(), 2);
    assert_eq!(stored.supplier_deliveries.len(), 1);
    assert_eq!(stored.driver.name, "Musa");
}

#[tokio::test]
async fn outstanding_carries_into_next_day() {
    let (engine, _db) = engine_with_db().await;
    let monday_record = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let first = scenario_a(&engine, &monday_record, &musa).await;

    let tuesday_record = open_day(&engine, tuesday()).await;
    let second = engine
        .open_driver_day(tuesday_record.id, musa.id, &staff(), tuesday())
        .await
        .unwrap();

    assert_eq!(second.outstanding_start_naira, first.outstanding_end_naira);
    assert_eq!(second.outstanding_end_naira, first.outstanding_end_naira);
    assert_eq!(second.driver_commission_rate, None);
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = scenario_a(&engine, &day, &musa).await;

    let first = engine
        .recompute_driver_day(driver_day.id, monday())
        .await
        .unwrap();
    let second = engine
        .recompute_driver_day(driver_day.id, monday())
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first, driver_day);
}

#[tokio::test]
async fn final_return_cannot_exceed_loaded_bags() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = scenario_a(&engine, &day, &musa).await;

    let err = engine
        .update_return(driver_day.id, 151, &staff(), monday())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("final return of 151 bags exceeds 150 bags loaded".to_string())
    );

    let err = engine
        .update_return(driver_day.id, -1, &staff(), monday())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let stored = engine.driver_day(driver_day.id).await.unwrap().driver_day;
    assert_eq!(stored.final_return_bags, 0);
}

#[tokio::test]
async fn gate_pass_is_unique_across_drivers_of_a_day() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let bala = driver(&engine, "Bala").await;
    scenario_a(&engine, &day, &musa).await;
    let other = engine
        .open_driver_day(day.id, bala.id, &staff(), monday())
        .await
        .unwrap();

    let err = engine
        .add_trip(TripCmd::new(other.id, " GP-001 ", 40), &staff(), monday())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // Nothing of the failed insert survives.
    let stored = engine.driver_day(other.id).await.unwrap();
    assert!(stored.trips.is_empty());
    assert_eq!(stored.driver_day.total_loaded_bags, 0);

    // The same gate pass is fine on another day.
    let tuesday_record = open_day(&engine, tuesday()).await;
    let next = engine
        .open_driver_day(tuesday_record.id, bala.id, &staff(), tuesday())
        .await
        .unwrap();
    engine
        .add_trip(TripCmd::new(next.id, "GP-001", 40), &staff(), tuesday())
        .await
        .unwrap();
}

#[tokio::test]
async fn driver_day_is_opened_once() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;

    engine
        .open_driver_day(day.id, musa.id, &staff(), monday())
        .await
        .unwrap();
    let err = engine
        .open_driver_day(day.id, musa.id, &staff(), monday())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    assert_eq!(engine.driver_days(day.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn inactive_driver_cannot_be_opened() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;

    engine
        .set_driver_active(musa.id, false, &owner(), monday())
        .await
        .unwrap();
    let err = engine
        .open_driver_day(day.id, musa.id, &staff(), monday())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.drivers(true).await.unwrap().is_empty());
    assert_eq!(engine.drivers(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn driver_names_are_unique_ignoring_case() {
    let (engine, _db) = engine_with_db().await;
    driver(&engine, "Musa").await;

    let err = engine
        .new_driver("  musa ", None, &owner(), monday())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("musa".to_string()));
}

#[tokio::test]
async fn closed_day_reopens_only_inside_unlock_window() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let closed_at = monday() + Duration::hours(9);

    let closed = engine.close_day(day.id, &staff(), closed_at).await.unwrap();
    assert_eq!(closed.status, DayStatus::Closed);
    assert_eq!(closed.closed_by.as_deref(), Some("ada"));
    // Closing twice is accepted.
    engine.close_day(day.id, &staff(), closed_at).await.unwrap();

    let expense = |amount| ExpenseCmd {
        day_id: day.id,
        category: "Fuel".to_string(),
        description: None,
        amount_naira: amount,
    };
    let err = engine
        .add_expense(expense(2_000), &staff(), closed_at)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::DayClosed("2026-10-19".to_string()));

    let err = engine
        .approve_unlock(day.id, 30, &owner(), closed_at)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    engine
        .request_unlock(day.id, "missed an expense", &staff(), closed_at)
        .await
        .unwrap();
    assert_eq!(engine.unlock_queue(closed_at).await.unwrap().len(), 1);
    let notifications = engine.notifications(true).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::UnlockRequest);

    let granted_at = closed_at + Duration::minutes(1);
    let granted = engine
        .approve_unlock(day.id, 30, &owner(), granted_at)
        .await
        .unwrap();
    assert_eq!(granted.status, DayStatus::Closed);
    assert_eq!(
        granted.unlock_request_reason.as_deref(),
        Some("missed an expense")
    );

    let inside = granted_at + Duration::minutes(10);
    assert!(engine.is_editable(day.id, inside).await.unwrap());
    assert!(engine.unlock_queue(inside).await.unwrap().is_empty());
    engine
        .add_expense(expense(2_000), &staff(), inside)
        .await
        .unwrap();

    let expired = granted_at + Duration::minutes(30);
    assert!(!engine.is_editable(day.id, expired).await.unwrap());
    assert_eq!(engine.unlock_queue(expired).await.unwrap().len(), 1);
    let err = engine
        .add_expense(expense(500), &staff(), expired)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DayClosed(_)));
}

#[tokio::test]
async fn unlock_needs_a_closed_day_and_positive_window() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;

    let err = engine
        .request_unlock(day.id, "typo", &staff(), monday())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    engine.close_day(day.id, &staff(), monday()).await.unwrap();
    engine
        .request_unlock(day.id, "typo", &staff(), monday())
        .await
        .unwrap();
    let err = engine
        .approve_unlock(day.id, 0, &owner(), monday())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn seeded_rates_survive_settings_changes() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = scenario_a(&engine, &day, &musa).await;
    assert_eq!(driver_day.driver_commission_rate, Some(5));

    engine
        .update_rates(
            Rates {
                retail_price_per_bag: 350,
                driver_commission_per_bag: 8,
                motor_boy_commission_per_bag: 4,
            },
            &owner(),
            monday(),
        )
        .await
        .unwrap();

    let recomputed = engine
        .recompute_driver_day(driver_day.id, monday())
        .await
        .unwrap();
    assert_eq!(recomputed.driver_commission_rate, Some(5));
    assert_eq!(recomputed.driver_commission_naira, 750);
    assert_eq!(recomputed.motor_boy_commission_naira, 450);

    let bala = driver(&engine, "Bala").await;
    let fresh = engine
        .open_driver_day(day.id, bala.id, &staff(), monday())
        .await
        .unwrap();
    let (_, fresh) = engine
        .add_trip(TripCmd::new(fresh.id, "GP-100", 10), &staff(), monday())
        .await
        .unwrap();
    assert_eq!(fresh.driver_commission_rate, Some(8));
    assert_eq!(fresh.motor_boy_commission_rate, Some(4));
    assert_eq!(fresh.driver_commission_naira, 80);
}

#[tokio::test]
async fn claimed_transfers_count_whatever_their_status() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = scenario_a(&engine, &day, &musa).await;

    let (transfer, updated) = engine
        .add_transfer(
            TransferCmd::new(day.id, TransferTarget::DriverDay(driver_day.id), 12_500)
                .sender_name("Chidi")
                .reference("FT-2231"),
            &staff(),
            monday(),
        )
        .await
        .unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending);
    let updated = updated.unwrap();
    assert_eq!(updated.received_logged_naira, 12_500);
    assert_eq!(
        updated.outstanding_end_naira,
        driver_day.outstanding_end_naira - 12_500
    );

    engine
        .set_transfer_status(transfer.id, TransferStatus::NotFound, &owner(), monday())
        .await
        .unwrap();
    let recomputed = engine
        .recompute_driver_day(driver_day.id, monday())
        .await
        .unwrap();
    assert_eq!(recomputed, updated);

    let (unlinked, none) = engine
        .add_transfer(
            TransferCmd::new(day.id, TransferTarget::Unlinked, 3_000),
            &staff(),
            monday(),
        )
        .await
        .unwrap();
    assert!(none.is_none());
    assert_eq!(unlinked.target, TransferTarget::Unlinked);
    assert_eq!(engine.transfers(day.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn scenario_d_cash_reconciliation() {
    let (engine, _db) = engine_with_db().await;

    // Monday ends with 5000 in the drawer.
    let monday_record = open_day(&engine, monday()).await;
    let ledger = engine
        .submit_closing_cash(monday_record.id, 5_000, &staff(), monday())
        .await
        .unwrap();
    assert_eq!(ledger.variance_naira, 5_000);

    let now = tuesday();
    let day = open_day(&engine, now).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = engine
        .open_driver_day(day.id, musa.id, &staff(), now)
        .await
        .unwrap();
    engine
        .update_cash(driver_day.id, 100_000, &staff(), now)
        .await
        .unwrap();
    engine
        .add_office_sale(
            OfficeSaleCmd {
                day_id: day.id,
                customer_name: Some("Mama Nkechi".to_string()),
                bags: 100,
                price_per_bag: None,
                payment_type: PaymentType::Cash,
            },
            &staff(),
            now,
        )
        .await
        .unwrap();
    // Transfers never reach the drawer.
    engine
        .add_office_sale(
            OfficeSaleCmd {
                day_id: day.id,
                customer_name: None,
                bags: 10,
                price_per_bag: Some(360),
                payment_type: PaymentType::Transfer,
            },
            &staff(),
            now,
        )
        .await
        .unwrap();
    let delivery = engine
        .add_dispenser_delivery(
            DispenserDeliveryCmd {
                day_id: day.id,
                customer_name: "Grace Hotel".to_string(),
                bottles: 40,
                amount_naira: 20_000,
            },
            &staff(),
            now,
        )
        .await
        .unwrap();
    let delivery = engine
        .record_dispenser_payment(delivery.id, 16_500, PaymentType::Cash, &staff(), now)
        .await
        .unwrap();
    assert_eq!(delivery.balance_naira(), 3_500);
    for amount in [12_000, 5_000] {
        engine
            .add_expense(
                ExpenseCmd {
                    day_id: day.id,
                    category: "Diesel".to_string(),
                    description: None,
                    amount_naira: amount,
                },
                &staff(),
                now,
            )
            .await
            .unwrap();
    }

    let stats = engine.cash_stats(day.id).await.unwrap();
    assert_eq!(stats.opening_cash_naira, 5_000);
    assert_eq!(stats.cash_in_naira, 151_500);
    assert_eq!(stats.spent_naira, 17_000);
    assert_eq!(stats.expected_cash_naira, 139_500);
    assert_eq!(stats.variance_naira, None);

    let ledger = engine
        .submit_closing_cash(day.id, 140_000, &staff(), now)
        .await
        .unwrap();
    assert_eq!(ledger.variance_naira, 500);
    assert!(engine.notifications(false).await.unwrap().is_empty());

    // Resubmission overwrites the single ledger row.
    let ledger = engine
        .submit_closing_cash(day.id, 130_000, &staff(), now)
        .await
        .unwrap();
    assert_eq!(ledger.variance_naira, -9_500);
    engine
        .submit_closing_cash(day.id, 120_000, &staff(), now)
        .await
        .unwrap();
    let stored = engine.cash_ledger(day.id).await.unwrap().unwrap();
    assert_eq!(stored.id, ledger.id);
    assert_eq!(stored.closing_cash_naira, 120_000);
    assert_eq!(
        engine.cash_stats(day.id).await.unwrap().variance_naira,
        Some(-19_500)
    );

    let alerts = engine.notifications(false).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, NotificationKind::CashVariance);
}

#[tokio::test]
async fn overpaying_a_dispenser_delivery_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let delivery = engine
        .add_dispenser_delivery(
            DispenserDeliveryCmd {
                day_id: day.id,
                customer_name: "Grace Hotel".to_string(),
                bottles: 10,
                amount_naira: 5_000,
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();

    let err = engine
        .record_dispenser_payment(delivery.id, 6_000, PaymentType::Cash, &staff(), monday())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let stored = engine.dispenser_deliveries(day.id).await.unwrap();
    assert_eq!(stored[0].paid_naira, 0);
}

#[tokio::test]
async fn inventory_rolls_over_and_alerts_once() {
    let (engine, _db) = engine_with_db().await;

    let monday_record = open_day(&engine, monday()).await;
    let counted = engine
        .update_inventory(
            monday_record.id,
            InventoryUpdate {
                produced_bags: Some(200),
                closing_bags_confirmed: Some(200),
                ..Default::default()
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();
    assert_eq!(counted.closing_bags_computed, 200);
    assert_eq!(counted.variance_bags, 0);

    let now = tuesday();
    let day = open_day(&engine, now).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = engine
        .open_driver_day(day.id, musa.id, &staff(), now)
        .await
        .unwrap();
    engine
        .add_trip(TripCmd::new(driver_day.id, "GP-777", 700), &staff(), now)
        .await
        .unwrap();
    engine
        .add_office_sale(
            OfficeSaleCmd {
                day_id: day.id,
                customer_name: None,
                bags: 60,
                price_per_bag: None,
                payment_type: PaymentType::Cash,
            },
            &staff(),
            now,
        )
        .await
        .unwrap();
    engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                produced_bags: Some(1_000),
                spoilage_bags: Some(10),
                ..Default::default()
            },
            &staff(),
            now,
        )
        .await
        .unwrap();

    let live = engine.inventory_day(day.id, now).await.unwrap();
    assert_eq!(live.opening_bags, 200);
    assert_eq!(live.outgoing_driver_loads_bags, 700);
    assert_eq!(live.outgoing_office_sales_bags, 60);
    assert_eq!(live.closing_bags_computed, 430);
    assert_eq!(live.variance_bags, 0);

    let counted = engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                closing_bags_confirmed: Some(370),
                ..Default::default()
            },
            &staff(),
            now,
        )
        .await
        .unwrap();
    assert_eq!(counted.variance_bags, -60);
    engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                notes: Some("recount tomorrow".to_string()),
                ..Default::default()
            },
            &staff(),
            now,
        )
        .await
        .unwrap();

    let alerts: Vec<_> = engine
        .notifications(false)
        .await
        .unwrap()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::InventoryVariance)
        .collect();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].day_id, Some(day.id));

    let err = engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                spoilage_bags: Some(-1),
                ..Default::default()
            },
            &staff(),
            now,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn expense_review_is_allowed_after_close() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let expense = engine
        .add_expense(
            ExpenseCmd {
                day_id: day.id,
                category: "Repairs".to_string(),
                description: Some("tyre".to_string()),
                amount_naira: 4_000,
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();
    assert_eq!(expense.owner_reviewed_status, ReviewStatus::Pending);
    engine.close_day(day.id, &staff(), monday()).await.unwrap();

    let reviewed = engine
        .review_expense(
            expense.id,
            ReviewStatus::Queried,
            Some("receipt?"),
            &owner(),
            monday(),
        )
        .await
        .unwrap();
    assert_eq!(reviewed.owner_reviewed_status, ReviewStatus::Queried);
    assert_eq!(reviewed.reviewed_by.as_deref(), Some("boss"));
    assert_eq!(reviewed.review_note.as_deref(), Some("receipt?"));
}

#[tokio::test]
async fn mutations_leave_an_audit_trail() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    engine.close_day(day.id, &owner(), monday()).await.unwrap();

    let entries = engine
        .audit_log(AuditFilter {
            entity_type: Some("day".to_string()),
            entity_id: Some(day.id.to_string()),
            limit: None,
        })
        .await
        .unwrap();
    let actions: Vec<_> = entries.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"open"));
    assert!(actions.contains(&"close"));

    let close = entries.iter().find(|e| e.action == "close").unwrap();
    assert_eq!(close.actor_id, "boss");
    assert_eq!(close.role, Role::Owner);
    assert_eq!(
        close.new_snapshot.as_ref().unwrap()["status"],
        serde_json::json!("CLOSED")
    );
    assert_eq!(
        close.old_snapshot.as_ref().unwrap()["status"],
        serde_json::json!("OPEN")
    );
}

#[tokio::test]
async fn day_summary_collects_live_figures() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    scenario_a(&engine, &day, &musa).await;

    let summary = engine.day_summary(day.id, monday()).await.unwrap();
    assert!(summary.is_editable);
    assert!(!summary.is_pending_unlock);
    assert_eq!(summary.driver_days, 1);
    assert_eq!(summary.inventory.outgoing_driver_loads_bags, 150);
    assert_eq!(summary.cash.cash_in_naira, 0);
}

#[tokio::test]
async fn dispenser_payments_stay_on_their_day_and_method() {
    let (engine, _db) = engine_with_db().await;
    let monday_record = open_day(&engine, monday()).await;
    let delivery = engine
        .add_dispenser_delivery(
            DispenserDeliveryCmd {
                day_id: monday_record.id,
                customer_name: "Grace Hotel".to_string(),
                bottles: 20,
                amount_naira: 10_000,
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();

    engine
        .record_dispenser_payment(delivery.id, 5_000, PaymentType::Cash, &staff(), monday())
        .await
        .unwrap();
    let later = monday() + Duration::hours(1);
    engine
        .record_dispenser_payment(delivery.id, 1_000, PaymentType::Transfer, &staff(), later)
        .await
        .unwrap();
    assert_eq!(
        engine.cash_stats(monday_record.id).await.unwrap().cash_in_naira,
        5_000
    );

    let ledger = engine
        .submit_closing_cash(monday_record.id, 5_000, &staff(), monday())
        .await
        .unwrap();
    assert_eq!(ledger.variance_naira, 0);
    engine
        .close_day(monday_record.id, &staff(), monday())
        .await
        .unwrap();

    let tuesday_record = open_day(&engine, tuesday()).await;
    let delivery = engine
        .record_dispenser_payment(delivery.id, 3_000, PaymentType::Cash, &staff(), tuesday())
        .await
        .unwrap();
    assert_eq!(delivery.paid_naira, 9_000);
    assert_eq!(delivery.balance_naira(), 1_000);

    let closed = engine.cash_stats(monday_record.id).await.unwrap();
    assert_eq!(closed.cash_in_naira, 5_000);
    assert_eq!(closed.variance_naira, Some(0));

    let next = engine.cash_stats(tuesday_record.id).await.unwrap();
    assert_eq!(next.opening_cash_naira, 5_000);
    assert_eq!(next.cash_in_naira, 3_000);

    let payments = engine.dispenser_payments(delivery.id).await.unwrap();
    let summary: Vec<_> = payments
        .iter()
        .map(|p| (p.amount_naira, p.method, p.paid_at))
        .collect();
    assert_eq!(
        summary,
        vec![
            (5_000, PaymentType::Cash, monday()),
            (1_000, PaymentType::Transfer, later),
            (3_000, PaymentType::Cash, tuesday()),
        ]
    );
}

#[tokio::test]
async fn closed_driver_day_keeps_its_figures_after_a_price_change() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = scenario_a(&engine, &day, &musa).await;
    assert_eq!(driver_day.expected_naira, 52_500);

    engine.close_day(day.id, &staff(), monday()).await.unwrap();
    engine
        .update_rates(
            Rates {
                retail_price_per_bag: 400,
                driver_commission_per_bag: 5,
                motor_boy_commission_per_bag: 3,
            },
            &owner(),
            monday(),
        )
        .await
        .unwrap();

    let err = engine
        .recompute_driver_day(driver_day.id, monday())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::DayClosed("2026-10-19".to_string()));

    let stored = engine.driver_day(driver_day.id).await.unwrap().driver_day;
    assert_eq!(stored.expected_naira, 52_500);
    assert_eq!(stored.outstanding_end_naira, 52_300);
}

#[tokio::test]
async fn oversized_trip_is_rejected_and_rolled_back() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let musa = driver(&engine, "Musa").await;
    let driver_day = engine
        .open_driver_day(day.id, musa.id, &staff(), monday())
        .await
        .unwrap();

    let err = engine
        .add_trip(
            TripCmd::new(driver_day.id, "GP-BIG", 100_000_000_000_000_000),
            &staff(),
            monday(),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("expected amount overflow".to_string())
    );

    let stored = engine.driver_day(driver_day.id).await.unwrap();
    assert!(stored.trips.is_empty());
    assert_eq!(stored.driver_day.total_loaded_bags, 0);
}

#[tokio::test]
async fn trips_after_the_physical_count_raise_a_stock_alert() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    let counted = engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                produced_bags: Some(430),
                closing_bags_confirmed: Some(430),
                ..Default::default()
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();
    assert_eq!(counted.variance_bags, 0);
    assert!(engine.notifications(false).await.unwrap().is_empty());

    let musa = driver(&engine, "Musa").await;
    let driver_day = engine
        .open_driver_day(day.id, musa.id, &staff(), monday())
        .await
        .unwrap();
    engine
        .add_trip(TripCmd::new(driver_day.id, "GP-100", 100), &staff(), monday())
        .await
        .unwrap();

    let live = engine.inventory_day(day.id, monday()).await.unwrap();
    assert_eq!(live.closing_bags_computed, 330);
    assert_eq!(live.variance_bags, 100);
    engine.inventory_day(day.id, monday()).await.unwrap();

    let alerts = engine.notifications(false).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, NotificationKind::InventoryVariance);
    assert_eq!(alerts[0].day_id, Some(day.id));
}

#[tokio::test]
async fn physical_count_can_be_cleared() {
    let (engine, _db) = engine_with_db().await;
    let day = open_day(&engine, monday()).await;
    engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                produced_bags: Some(100),
                closing_bags_confirmed: Some(90),
                ..Default::default()
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();

    let err = engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                closing_bags_confirmed: Some(95),
                clear_closing_bags_confirmed: true,
                ..Default::default()
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let cleared = engine
        .update_inventory(
            day.id,
            InventoryUpdate {
                clear_closing_bags_confirmed: true,
                ..Default::default()
            },
            &staff(),
            monday(),
        )
        .await
        .unwrap();
    assert_eq!(cleared.closing_bags_confirmed, None);
    assert_eq!(cleared.variance_bags, 0);
    assert_eq!(cleared.produced_bags, 100);
}
