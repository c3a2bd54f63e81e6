//! Bags sold over the counter at the office.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

/// How a customer paid. Only `Cash` lands in the cash drawer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Transfer,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Transfer => "TRANSFER",
        }
    }
}

impl TryFrom<&str> for PaymentType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CASH" => Ok(Self::Cash),
            "TRANSFER" => Ok(Self::Transfer),
            other => Err(EngineError::Validation(format!(
                "invalid payment type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeSale {
    pub id: Uuid,
    pub day_id: Uuid,
    pub customer_name: Option<String>,
    pub bags: i64,
    pub price_per_bag: i64,
    pub amount_naira: i64,
    pub payment_type: PaymentType,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl OfficeSale {
    pub fn new(
        day_id: Uuid,
        customer_name: Option<String>,
        bags: i64,
        price_per_bag: i64,
        payment_type: PaymentType,
        created_by: String,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if bags <= 0 {
            return Err(EngineError::InvalidAmount("bags must be > 0".to_string()));
        }
        if price_per_bag <= 0 {
            return Err(EngineError::InvalidAmount(
                "price_per_bag must be > 0".to_string(),
            ));
        }
        let amount_naira = bags
            .checked_mul(price_per_bag)
            .ok_or_else(|| EngineError::InvalidAmount("sale amount overflow".to_string()))?;
        Ok(Self {
            id: Uuid::new_v4(),
            day_id,
            customer_name,
            bags,
            price_per_bag,
            amount_naira,
            payment_type,
            created_by,
            created_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "office_sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub customer_name: Option<String>,
    pub bags: i64,
    pub price_per_bag: i64,
    pub amount_naira: i64,
    pub payment_type: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
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

impl From<&OfficeSale> for ActiveModel {
    fn from(value: &OfficeSale) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            customer_name: ActiveValue::Set(value.customer_name.clone()),
            bags: ActiveValue::Set(value.bags),
            price_per_bag: ActiveValue::Set(value.price_per_bag),
            amount_naira: ActiveValue::Set(value.amount_naira),
            payment_type: ActiveValue::Set(value.payment_type.as_str().to_string()),
            created_by: ActiveValue::Set(value.created_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for OfficeSale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "office sale")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            customer_name: model.customer_name,
            bags: model.bags,
            price_per_bag: model.price_per_bag,
            amount_naira: model.amount_naira,
            payment_type: PaymentType::try_from(model.payment_type.as_str())?,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
