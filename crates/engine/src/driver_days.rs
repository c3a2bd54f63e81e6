//! The module contains `DriverDay`, the per-driver ledger entry of a day.
//!
//! Raw inputs (opening outstanding, final return, cash handed in, road
//! expenses) are set by staff; every other figure is derived by
//! [`recompute`](crate::recompute) from the driver day's children.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, recompute::DriverDayTotals, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDay {
    pub id: Uuid,
    pub day_id: Uuid,
    pub driver_id: Uuid,
    pub outstanding_start_naira: i64,
    pub final_return_bags: i64,
    pub cash_received_naira: i64,
    pub expenses_naira: i64,
    /// Rate snapshots, seeded once from the company settings and then frozen.
    pub driver_commission_rate: Option<i64>,
    pub motor_boy_commission_rate: Option<i64>,
    pub total_trips: i64,
    pub total_loaded_bags: i64,
    pub total_sold_bags: i64,
    pub supplier_bags: i64,
    pub normal_bags: i64,
    pub expected_naira: i64,
    pub received_logged_naira: i64,
    pub driver_commission_naira: i64,
    pub motor_boy_commission_naira: i64,
    pub outstanding_end_naira: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriverDay {
    pub fn new(
        day_id: Uuid,
        driver_id: Uuid,
        outstanding_start_naira: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            day_id,
            driver_id,
            outstanding_start_naira,
            final_return_bags: 0,
            cash_received_naira: 0,
            expenses_naira: 0,
            driver_commission_rate: None,
            motor_boy_commission_rate: None,
            total_trips: 0,
            total_loaded_bags: 0,
            total_sold_bags: 0,
            supplier_bags: 0,
            normal_bags: 0,
            expected_naira: 0,
            received_logged_naira: 0,
            driver_commission_naira: 0,
            motor_boy_commission_naira: 0,
            // Nothing loaded yet: the driver still owes what they owed.
            outstanding_end_naira: outstanding_start_naira,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "driver_days")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub driver_id: String,
    pub outstanding_start_naira: i64,
    pub final_return_bags: i64,
    pub cash_received_naira: i64,
    pub expenses_naira: i64,
    pub driver_commission_rate: Option<i64>,
    pub motor_boy_commission_rate: Option<i64>,
    pub total_trips: i64,
    pub total_loaded_bags: i64,
    pub total_sold_bags: i64,
    pub supplier_bags: i64,
    pub normal_bags: i64,
    pub expected_naira: i64,
    pub received_logged_naira: i64,
    pub driver_commission_naira: i64,
    pub motor_boy_commission_naira: i64,
    pub outstanding_end_naira: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::days::Entity",
        from = "Column::DayId",
        to = "super::days::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Days,
    #[sea_orm(
        belongs_to = "super::drivers::Entity",
        from = "Column::DriverId",
        to = "super::drivers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Drivers,
    #[sea_orm(has_many = "super::trips::Entity")]
    Trips,
    #[sea_orm(has_many = "super::supplier_deliveries::Entity")]
    SupplierDeliveries,
}

impl Related<super::days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl Related<super::drivers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drivers.def()
    }
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::supplier_deliveries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierDeliveries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DriverDay> for ActiveModel {
    fn from(value: &DriverDay) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            driver_id: ActiveValue::Set(value.driver_id.to_string()),
            outstanding_start_naira: ActiveValue::Set(value.outstanding_start_naira),
            final_return_bags: ActiveValue::Set(value.final_return_bags),
            cash_received_naira: ActiveValue::Set(value.cash_received_naira),
            expenses_naira: ActiveValue::Set(value.expenses_naira),
            driver_commission_rate: ActiveValue::Set(value.driver_commission_rate),
            motor_boy_commission_rate: ActiveValue::Set(value.motor_boy_commission_rate),
            total_trips: ActiveValue::Set(value.total_trips),
            total_loaded_bags: ActiveValue::Set(value.total_loaded_bags),
            total_sold_bags: ActiveValue::Set(value.total_sold_bags),
            supplier_bags: ActiveValue::Set(value.supplier_bags),
            normal_bags: ActiveValue::Set(value.normal_bags),
            expected_naira: ActiveValue::Set(value.expected_naira),
            received_logged_naira: ActiveValue::Set(value.received_logged_naira),
            driver_commission_naira: ActiveValue::Set(value.driver_commission_naira),
            motor_boy_commission_naira: ActiveValue::Set(value.motor_boy_commission_naira),
            outstanding_end_naira: ActiveValue::Set(value.outstanding_end_naira),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl ActiveModel {
    /// Partial update carrying only the derived columns (and the seeded
    /// rate snapshots) so the recompute is a single write.
    pub(crate) fn from_totals(id: Uuid, totals: &DriverDayTotals, now: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::Unchanged(id.to_string()),
            driver_commission_rate: ActiveValue::Set(Some(totals.driver_commission_rate)),
            motor_boy_commission_rate: ActiveValue::Set(Some(totals.motor_boy_commission_rate)),
            total_trips: ActiveValue::Set(totals.total_trips),
            total_loaded_bags: ActiveValue::Set(totals.total_loaded_bags),
            total_sold_bags: ActiveValue::Set(totals.total_sold_bags),
            supplier_bags: ActiveValue::Set(totals.supplier_bags),
            normal_bags: ActiveValue::Set(totals.normal_bags),
            expected_naira: ActiveValue::Set(totals.expected_naira),
            received_logged_naira: ActiveValue::Set(totals.received_logged_naira),
            driver_commission_naira: ActiveValue::Set(totals.driver_commission_naira),
            motor_boy_commission_naira: ActiveValue::Set(totals.motor_boy_commission_naira),
            outstanding_end_naira: ActiveValue::Set(totals.outstanding_end_naira),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
    }
}

impl TryFrom<Model> for DriverDay {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "driver day")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            driver_id: parse_uuid(&model.driver_id, "driver")?,
            outstanding_start_naira: model.outstanding_start_naira,
            final_return_bags: model.final_return_bags,
            cash_received_naira: model.cash_received_naira,
            expenses_naira: model.expenses_naira,
            driver_commission_rate: model.driver_commission_rate,
            motor_boy_commission_rate: model.motor_boy_commission_rate,
            total_trips: model.total_trips,
            total_loaded_bags: model.total_loaded_bags,
            total_sold_bags: model.total_sold_bags,
            supplier_bags: model.supplier_bags,
            normal_bags: model.normal_bags,
            expected_naira: model.expected_naira,
            received_logged_naira: model.received_logged_naira,
            driver_commission_naira: model.driver_commission_naira,
            motor_boy_commission_naira: model.motor_boy_commission_naira,
            outstanding_end_naira: model.outstanding_end_naira,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
