//! Trips: one loading of a driver's vehicle, identified by the gate pass
//! printed at the warehouse exit.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    /// Denormalized from the driver day; gate passes are unique per day.
    pub day_id: Uuid,
    pub driver_day_id: Uuid,
    pub gate_pass_number: String,
    pub loaded_bags: i64,
    pub depart_time: Option<DateTime<Utc>>,
    pub return_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(
        day_id: Uuid,
        driver_day_id: Uuid,
        gate_pass_number: String,
        loaded_bags: i64,
        depart_time: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if loaded_bags <= 0 {
            return Err(EngineError::InvalidAmount(
                "loaded_bags must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            day_id,
            driver_day_id,
            gate_pass_number,
            loaded_bags,
            depart_time,
            return_time: None,
            created_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub driver_day_id: String,
    pub gate_pass_number: String,
    pub loaded_bags: i64,
    pub depart_time: Option<DateTimeUtc>,
    pub return_time: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::driver_days::Entity",
        from = "Column::DriverDayId",
        to = "super::driver_days::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    DriverDays,
}

impl Related<super::driver_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DriverDays.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Trip> for ActiveModel {
    fn from(value: &Trip) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            driver_day_id: ActiveValue::Set(value.driver_day_id.to_string()),
            gate_pass_number: ActiveValue::Set(value.gate_pass_number.clone()),
            loaded_bags: ActiveValue::Set(value.loaded_bags),
            depart_time: ActiveValue::Set(value.depart_time),
            return_time: ActiveValue::Set(value.return_time),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "trip")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            driver_day_id: parse_uuid(&model.driver_day_id, "driver day")?,
            gate_pass_number: model.gate_pass_number,
            loaded_bags: model.loaded_bags,
            depart_time: model.depart_time,
            return_time: model.return_time,
            created_at: model.created_at,
        })
    }
}
