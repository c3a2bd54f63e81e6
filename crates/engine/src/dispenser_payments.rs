//! Individual payments taken against a dispenser delivery.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, PaymentType, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenserPayment {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub amount_naira: i64,
    pub method: PaymentType,
    pub paid_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dispenser_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub delivery_id: String,
    pub amount_naira: i64,
    pub method: String,
    pub paid_at: DateTimeUtc,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dispenser_deliveries::Entity",
        from = "Column::DeliveryId",
        to = "super::dispenser_deliveries::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DispenserDeliveries,
}

impl Related<super::dispenser_deliveries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DispenserDeliveries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DispenserPayment> for ActiveModel {
    fn from(value: &DispenserPayment) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            delivery_id: ActiveValue::Set(value.delivery_id.to_string()),
            amount_naira: ActiveValue::Set(value.amount_naira),
            method: ActiveValue::Set(value.method.as_str().to_string()),
            paid_at: ActiveValue::Set(value.paid_at),
            created_by: ActiveValue::Set(value.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for DispenserPayment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "dispenser payment")?,
            delivery_id: parse_uuid(&model.delivery_id, "dispenser delivery")?,
            amount_naira: model.amount_naira,
            method: PaymentType::try_from(model.method.as_str())?,
            paid_at: model.paid_at,
            created_by: model.created_by,
        })
    }
}
