//! Driver profiles. A driver works with an optional motor boy; both earn a
//! per-bag commission on the driver's normal sales.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub motor_boy_name: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    pub fn new(name: String, motor_boy_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            motor_boy_name,
            active: true,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub motor_boy_name: Option<String>,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::driver_days::Entity")]
    DriverDays,
}

impl Related<super::driver_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DriverDays.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Driver> for ActiveModel {
    fn from(value: &Driver) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            motor_boy_name: ActiveValue::Set(value.motor_boy_name.clone()),
            active: ActiveValue::Set(value.active),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Driver {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "driver")?,
            name: model.name,
            motor_boy_name: model.motor_boy_name,
            active: model.active,
            created_at: model.created_at,
        })
    }
}
