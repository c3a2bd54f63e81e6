//! The closing cash count of a day. At most one row per day; a new
//! submission overwrites the previous one.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashLedger {
    pub id: Uuid,
    pub day_id: Uuid,
    pub opening_cash_naira: i64,
    pub cash_received_naira: i64,
    pub cash_spent_naira: i64,
    pub closing_cash_naira: i64,
    pub variance_naira: i64,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub day_id: String,
    pub opening_cash_naira: i64,
    pub cash_received_naira: i64,
    pub cash_spent_naira: i64,
    pub closing_cash_naira: i64,
    pub variance_naira: i64,
    pub submitted_by: String,
    pub submitted_at: DateTimeUtc,
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
}

impl Related<super::days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CashLedger> for ActiveModel {
    fn from(value: &CashLedger) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            opening_cash_naira: ActiveValue::Set(value.opening_cash_naira),
            cash_received_naira: ActiveValue::Set(value.cash_received_naira),
            cash_spent_naira: ActiveValue::Set(value.cash_spent_naira),
            closing_cash_naira: ActiveValue::Set(value.closing_cash_naira),
            variance_naira: ActiveValue::Set(value.variance_naira),
            submitted_by: ActiveValue::Set(value.submitted_by.clone()),
            submitted_at: ActiveValue::Set(value.submitted_at),
        }
    }
}

impl TryFrom<Model> for CashLedger {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "cash ledger")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            opening_cash_naira: model.opening_cash_naira,
            cash_received_naira: model.cash_received_naira,
            cash_spent_naira: model.cash_spent_naira,
            closing_cash_naira: model.closing_cash_naira,
            variance_naira: model.variance_naira,
            submitted_by: model.submitted_by,
            submitted_at: model.submitted_at,
        })
    }
}
