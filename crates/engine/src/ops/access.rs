use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    DayRecord, DispenserDelivery, Driver, DriverDay, EngineError, Expense, ResultEngine,
    TransferLog, Trip, days, dispenser_deliveries, driver_days, drivers, expenses,
    office_sales, transfer_logs, trips,
};

use super::Engine;

/// Generates a `require_*` loader that fetches a row by id and converts it
/// into its domain type, reporting `KeyNotFound` when absent.
macro_rules! impl_require {
    ($fn_name:ident, $entity:path, $domain:ty, $err_msg:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<$domain> {
            let model = <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))?;
            <$domain>::try_from(model)
        }
    };
}

impl Engine {
    impl_require!(require_day, days::Entity, DayRecord, "day not exists");
    impl_require!(require_driver, drivers::Entity, Driver, "driver not exists");
    impl_require!(
        require_driver_day,
        driver_days::Entity,
        DriverDay,
        "driver day not exists"
    );
    impl_require!(require_trip, trips::Entity, Trip, "trip not exists");
    impl_require!(
        require_transfer,
        transfer_logs::Entity,
        TransferLog,
        "transfer not exists"
    );
    impl_require!(
        require_dispenser_delivery,
        dispenser_deliveries::Entity,
        DispenserDelivery,
        "dispenser delivery not exists"
    );
    impl_require!(require_expense, expenses::Entity, Expense, "expense not exists");

    /// Load a day and fail with `DayClosed` unless it is editable at `now`.
    pub(super) async fn require_editable_day(
        &self,
        db: &DatabaseTransaction,
        day_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<DayRecord> {
        let day = self.require_day(db, day_id).await?;
        day.ensure_editable(now)?;
        Ok(day)
    }

    /// Load a driver day together with its owning day, which must be
    /// editable at `now`.
    pub(super) async fn require_editable_driver_day(
        &self,
        db: &DatabaseTransaction,
        driver_day_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<(DayRecord, DriverDay)> {
        let driver_day = self.require_driver_day(db, driver_day_id).await?;
        let day = self
            .require_editable_day(db, driver_day.day_id, now)
            .await?;
        Ok((day, driver_day))
    }

    pub(super) async fn office_sale_exists_in_day(
        &self,
        db: &DatabaseTransaction,
        day_id: Uuid,
        office_sale_id: Uuid,
    ) -> ResultEngine<bool> {
        office_sales::Entity::find_by_id(office_sale_id.to_string())
            .filter(office_sales::Column::DayId.eq(day_id.to_string()))
            .one(db)
            .await
            .map(|model| model.is_some())
            .map_err(Into::into)
    }
}
