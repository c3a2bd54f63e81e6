use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Actor, AuditEntry, Driver, DriverDay, EngineError, ResultEngine, SupplierDelivery,
    SupplierDeliveryCmd, TransferLog, Trip, TripCmd, days, driver_days,
    recompute::{driver_day_totals, ensure_return_within_loaded, total_loaded_bags},
    supplier_deliveries, transfer_logs, trips,
    util::{ensure_non_negative, normalize_required_text},
};

use super::{Engine, with_tx};

/// A driver day with every child the recompute reads.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriverDayDetail {
    pub driver_day: DriverDay,
    pub driver: Driver,
    pub trips: Vec<Trip>,
    pub supplier_deliveries: Vec<SupplierDelivery>,
    pub transfers: Vec<TransferLog>,
}

impl Engine {
    /// Open the ledger of `driver_id` on `day_id`.
    ///
    /// The opening outstanding is the closing outstanding of the driver's
    /// latest earlier driver day.
    pub async fn open_driver_day(
        &self,
        day_id: Uuid,
        driver_id: Uuid,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DriverDay> {
        let driver_day = with_tx!(self, |db_tx| {
            let day = self.require_editable_day(&db_tx, day_id, now).await?;
            let driver = self.require_driver(&db_tx, driver_id).await?;
            if !driver.active {
                return Err(EngineError::Validation(format!(
                    "driver {} is inactive",
                    driver.name
                )));
            }

            let duplicate = driver_days::Entity::find()
                .filter(driver_days::Column::DayId.eq(day_id.to_string()))
                .filter(driver_days::Column::DriverId.eq(driver_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if duplicate {
                return Err(EngineError::ExistingKey(format!(
                    "{} already has a driver day on {}",
                    driver.name, day.date
                )));
            }

            let carried = driver_days::Entity::find()
                .inner_join(days::Entity)
                .filter(driver_days::Column::DriverId.eq(driver_id.to_string()))
                .filter(days::Column::Date.lt(day.date))
                .order_by_desc(days::Column::Date)
                .one(&db_tx)
                .await?
                .map(|model| model.outstanding_end_naira)
                .unwrap_or(0);

            let driver_day = DriverDay::new(day_id, driver_id, carried, now);
            // A concurrent open can still slip past the lookup above.
            driver_days::ActiveModel::from(&driver_day)
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    EngineError::on_unique_violation(err, || {
                        EngineError::ExistingKey(format!(
                            "{} already has a driver day on {}",
                            driver.name, day.date
                        ))
                    })
                })?;
            Ok(driver_day)
        })?;

        tracing::info!(
            driver_day = %driver_day.id,
            outstanding_start = driver_day.outstanding_start_naira,
            "driver day opened"
        );
        self.record(
            AuditEntry::new(actor, "driver_day", driver_day.id, "open", now)
                .new_state(&driver_day),
        )
        .await;
        Ok(driver_day)
    }

    pub async fn driver_day(&self, driver_day_id: Uuid) -> ResultEngine<DriverDayDetail> {
        with_tx!(self, |db_tx| {
            let driver_day = self.require_driver_day(&db_tx, driver_day_id).await?;
            let driver = self.require_driver(&db_tx, driver_day.driver_id).await?;
            let trips = self.trips_of(&db_tx, driver_day_id).await?;
            let supplier_deliveries = self.supplier_deliveries_of(&db_tx, driver_day_id).await?;
            let transfers = self.transfers_of(&db_tx, driver_day_id).await?;
            Ok(DriverDayDetail {
                driver_day,
                driver,
                trips,
                supplier_deliveries,
                transfers,
            })
        })
    }

    pub async fn driver_days(&self, day_id: Uuid) -> ResultEngine<Vec<DriverDay>> {
        let models = driver_days::Entity::find()
            .filter(driver_days::Column::DayId.eq(day_id.to_string()))
            .order_by_asc(driver_days::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(DriverDay::try_from).collect()
    }

    /// Load a trip. Gate passes are unique across all drivers of the day.
    pub async fn add_trip(
        &self,
        cmd: TripCmd,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<(Trip, DriverDay)> {
        let gate_pass = normalize_required_text(&cmd.gate_pass_number, "gate pass number")?;
        let (trip, driver_day) = with_tx!(self, |db_tx| {
            let (day, driver_day) = self
                .require_editable_driver_day(&db_tx, cmd.driver_day_id, now)
                .await?;
            let taken = trips::Entity::find()
                .filter(trips::Column::DayId.eq(day.id.to_string()))
                .filter(trips::Column::GatePassNumber.eq(gate_pass.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::Validation(format!(
                    "gate pass {gate_pass} already used on {}",
                    day.date
                )));
            }

            let trip = Trip::new(
                day.id,
                driver_day.id,
                gate_pass.clone(),
                cmd.loaded_bags,
                cmd.depart_time,
                now,
            )?;
            trips::ActiveModel::from(&trip)
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    EngineError::on_unique_violation(err, || {
                        EngineError::Validation(format!(
                            "gate pass {gate_pass} already used on {}",
                            day.date
                        ))
                    })
                })?;
            let driver_day = self.recompute_in_tx(&db_tx, driver_day, now).await?;
            self.refresh_inventory(&db_tx, &day, now).await?;
            Ok((trip, driver_day))
        })?;

        self.record(AuditEntry::new(actor, "trip", trip.id, "create", now).new_state(&trip))
            .await;
        Ok((trip, driver_day))
    }

    pub async fn record_trip_return(
        &self,
        trip_id: Uuid,
        return_time: DateTime<Utc>,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<Trip> {
        let (old, new) = with_tx!(self, |db_tx| {
            let old = self.require_trip(&db_tx, trip_id).await?;
            self.require_editable_driver_day(&db_tx, old.driver_day_id, now)
                .await?;
            let active_model = trips::ActiveModel {
                id: ActiveValue::Unchanged(trip_id.to_string()),
                return_time: ActiveValue::Set(Some(return_time)),
                ..Default::default()
            };
            let new = Trip::try_from(active_model.update(&db_tx).await?)?;
            Ok((old, new))
        })?;

        self.record(
            AuditEntry::new(actor, "trip", trip_id, "return", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    /// Set the bags brought back at the end of the day.
    pub async fn update_return(
        &self,
        driver_day_id: Uuid,
        final_return_bags: i64,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DriverDay> {
        self.update_raw_input(driver_day_id, "update_return", actor, now, |driver_day, loaded| {
            ensure_return_within_loaded(final_return_bags, loaded)?;
            driver_day.final_return_bags = final_return_bags;
            Ok(())
        })
        .await
    }

    pub async fn update_cash(
        &self,
        driver_day_id: Uuid,
        cash_received_naira: i64,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DriverDay> {
        ensure_non_negative(cash_received_naira, "cash_received_naira")?;
        self.update_raw_input(driver_day_id, "update_cash", actor, now, |driver_day, _| {
            driver_day.cash_received_naira = cash_received_naira;
            Ok(())
        })
        .await
    }

    /// Road expenses the driver paid out of the takings.
    pub async fn update_expenses(
        &self,
        driver_day_id: Uuid,
        expenses_naira: i64,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DriverDay> {
        ensure_non_negative(expenses_naira, "expenses_naira")?;
        self.update_raw_input(driver_day_id, "update_expenses", actor, now, |driver_day, _| {
            driver_day.expenses_naira = expenses_naira;
            Ok(())
        })
        .await
    }

    /// Shared body of the raw-input setters. `edit` receives the freshly
    /// summed loaded bags of the driver day.
    async fn update_raw_input<F>(
        &self,
        driver_day_id: Uuid,
        action: &str,
        actor: &Actor,
        now: DateTime<Utc>,
        edit: F,
    ) -> ResultEngine<DriverDay>
    where
        F: FnOnce(&mut DriverDay, i64) -> ResultEngine<()>,
    {
        let (old, new) = with_tx!(self, |db_tx| {
            let (_, old) = self
                .require_editable_driver_day(&db_tx, driver_day_id, now)
                .await?;
            let loaded = total_loaded_bags(&self.trips_of(&db_tx, driver_day_id).await?)?;

            let mut edited = old.clone();
            edit(&mut edited, loaded)?;
            let active_model = driver_days::ActiveModel {
                id: ActiveValue::Unchanged(driver_day_id.to_string()),
                final_return_bags: ActiveValue::Set(edited.final_return_bags),
                cash_received_naira: ActiveValue::Set(edited.cash_received_naira),
                expenses_naira: ActiveValue::Set(edited.expenses_naira),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            active_model.update(&db_tx).await?;

            let new = self.recompute_in_tx(&db_tx, edited, now).await?;
            Ok((old, new))
        })?;

        self.record(
            AuditEntry::new(actor, "driver_day", driver_day_id, action, now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    /// Divert bags of a driver day to a third-party supplier.
    pub async fn add_supplier_delivery(
        &self,
        cmd: SupplierDeliveryCmd,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<(SupplierDelivery, DriverDay)> {
        let supplier_name = normalize_required_text(&cmd.supplier_name, "supplier name")?;
        let delivery = SupplierDelivery::new(
            cmd.driver_day_id,
            supplier_name,
            cmd.bags,
            cmd.price_per_bag,
            now,
        )?;
        let driver_day = with_tx!(self, |db_tx| {
            let (_, driver_day) = self
                .require_editable_driver_day(&db_tx, cmd.driver_day_id, now)
                .await?;
            let loaded = total_loaded_bags(&self.trips_of(&db_tx, driver_day.id).await?)?;
            ensure_return_within_loaded(driver_day.final_return_bags, loaded)?;

            supplier_deliveries::ActiveModel::from(&delivery)
                .insert(&db_tx)
                .await?;
            self.recompute_in_tx(&db_tx, driver_day, now).await
        })?;

        self.record(
            AuditEntry::new(actor, "supplier_delivery", delivery.id, "create", now)
                .new_state(&delivery),
        )
        .await;
        Ok((delivery, driver_day))
    }

    /// Re-derive every computed figure of a driver day from its children.
    ///
    /// Running it twice without an intervening mutation changes nothing. A
    /// closed day keeps the figures it was closed with.
    pub async fn recompute_driver_day(
        &self,
        driver_day_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<DriverDay> {
        with_tx!(self, |db_tx| {
            let (_, driver_day) = self
                .require_editable_driver_day(&db_tx, driver_day_id, now)
                .await?;
            self.recompute_in_tx(&db_tx, driver_day, now).await
        })
    }

    /// Recompute inside the caller's transaction. `driver_day` must carry
    /// the raw inputs as they are now stored.
    pub(super) async fn recompute_in_tx(
        &self,
        db: &DatabaseTransaction,
        mut driver_day: DriverDay,
        now: DateTime<Utc>,
    ) -> ResultEngine<DriverDay> {
        let trips = self.trips_of(db, driver_day.id).await?;
        let supplier_deliveries = self.supplier_deliveries_of(db, driver_day.id).await?;
        let transfers = self.transfers_of(db, driver_day.id).await?;
        let rates = self.load_rates(db).await?;

        let totals =
            driver_day_totals(&driver_day, &trips, &supplier_deliveries, &transfers, &rates)?;
        driver_days::ActiveModel::from_totals(driver_day.id, &totals, now)
            .update(db)
            .await?;
        driver_day.apply(&totals);
        driver_day.updated_at = now;

        tracing::debug!(
            driver_day = %driver_day.id,
            sold = totals.total_sold_bags,
            expected = totals.expected_naira,
            outstanding_end = totals.outstanding_end_naira,
            "driver day recomputed"
        );
        Ok(driver_day)
    }

    async fn trips_of(&self, db: &DatabaseTransaction, driver_day_id: Uuid) -> ResultEngine<Vec<Trip>> {
        trips::Entity::find()
            .filter(trips::Column::DriverDayId.eq(driver_day_id.to_string()))
            .order_by_asc(trips::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .map(Trip::try_from)
            .collect()
    }

    async fn supplier_deliveries_of(
        &self,
        db: &DatabaseTransaction,
        driver_day_id: Uuid,
    ) -> ResultEngine<Vec<SupplierDelivery>> {
        supplier_deliveries::Entity::find()
            .filter(supplier_deliveries::Column::DriverDayId.eq(driver_day_id.to_string()))
            .order_by_asc(supplier_deliveries::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .map(SupplierDelivery::try_from)
            .collect()
    }

    async fn transfers_of(
        &self,
        db: &DatabaseTransaction,
        driver_day_id: Uuid,
    ) -> ResultEngine<Vec<TransferLog>> {
        transfer_logs::Entity::find()
            .filter(transfer_logs::Column::DriverDayId.eq(driver_day_id.to_string()))
            .order_by_asc(transfer_logs::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .map(TransferLog::try_from)
            .collect()
    }
}
