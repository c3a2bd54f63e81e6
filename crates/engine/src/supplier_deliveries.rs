//! Bags a driver diverted straight to a third-party supplier at a negotiated
//! price instead of selling them at retail.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDelivery {
    pub id: Uuid,
    pub driver_day_id: Uuid,
    pub supplier_name: String,
    pub bags: i64,
    pub price_per_bag: i64,
    pub amount_naira: i64,
    pub created_at: DateTime<Utc>,
}

impl SupplierDelivery {
    pub fn new(
        driver_day_id: Uuid,
        supplier_name: String,
        bags: i64,
        price_per_bag: i64,
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
        let amount_naira = bags.checked_mul(price_per_bag).ok_or_else(|| {
            EngineError::InvalidAmount("supplier amount overflow".to_string())
        })?;
        Ok(Self {
            id: Uuid::new_v4(),
            driver_day_id,
            supplier_name,
            bags,
            price_per_bag,
            amount_naira,
            created_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "supplier_deliveries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub driver_day_id: String,
    pub supplier_name: String,
    pub bags: i64,
    pub price_per_bag: i64,
    pub amount_naira: i64,
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

impl From<&SupplierDelivery> for ActiveModel {
    fn from(value: &SupplierDelivery) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            driver_day_id: ActiveValue::Set(value.driver_day_id.to_string()),
            supplier_name: ActiveValue::Set(value.supplier_name.clone()),
            bags: ActiveValue::Set(value.bags),
            price_per_bag: ActiveValue::Set(value.price_per_bag),
            amount_naira: ActiveValue::Set(value.amount_naira),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for SupplierDelivery {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "supplier delivery")?,
            driver_day_id: parse_uuid(&model.driver_day_id, "driver day")?,
            supplier_name: model.supplier_name,
            bags: model.bags,
            price_per_bag: model.price_per_bag,
            amount_naira: model.amount_naira,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn amount_is_bags_times_price() {
        let delivery = SupplierDelivery::new(
            Uuid::new_v4(),
            "Mama Nkechi".to_string(),
            20,
            340,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(delivery.amount_naira, 6_800);
    }

    #[test]
    fn rejects_non_positive_bags() {
        let err = SupplierDelivery::new(
            Uuid::new_v4(),
            "Mama Nkechi".to_string(),
            0,
            340,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::InvalidAmount("bags must be > 0".to_string()));
    }
}
