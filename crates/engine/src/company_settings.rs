//! Company-wide prices and commission rates (single row, `id = 1`).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

pub(crate) const SETTINGS_ROW_ID: i32 = 1;

/// Current rates as read at recompute time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    pub retail_price_per_bag: i64,
    pub driver_commission_per_bag: i64,
    pub motor_boy_commission_per_bag: i64,
}

impl Rates {
    pub fn validate(&self) -> ResultEngine<()> {
        if self.retail_price_per_bag <= 0 {
            return Err(EngineError::InvalidAmount(
                "retail_price_per_bag must be > 0".to_string(),
            ));
        }
        if self.driver_commission_per_bag < 0 || self.motor_boy_commission_per_bag < 0 {
            return Err(EngineError::InvalidAmount(
                "commission rates must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "company_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub retail_price_per_bag: i64,
    pub driver_commission_per_bag: i64,
    pub motor_boy_commission_per_bag: i64,
    pub updated_at: Option<DateTimeUtc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Rates {
    fn from(model: Model) -> Self {
        Self {
            retail_price_per_bag: model.retail_price_per_bag,
            driver_commission_per_bag: model.driver_commission_per_bag,
            motor_boy_commission_per_bag: model.motor_boy_commission_per_bag,
        }
    }
}

pub(crate) fn active_model(rates: &Rates, actor: &str, now: DateTime<Utc>) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::Unchanged(SETTINGS_ROW_ID),
        retail_price_per_bag: sea_orm::ActiveValue::Set(rates.retail_price_per_bag),
        driver_commission_per_bag: sea_orm::ActiveValue::Set(rates.driver_commission_per_bag),
        motor_boy_commission_per_bag: sea_orm::ActiveValue::Set(
            rates.motor_boy_commission_per_bag,
        ),
        updated_at: sea_orm::ActiveValue::Set(Some(now)),
        updated_by: sea_orm::ActiveValue::Set(Some(actor.to_string())),
    }
}
