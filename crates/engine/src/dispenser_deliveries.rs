//! Dispenser bottle deliveries. Customers often pay later and in parts.
//! Each payment is its own `dispenser_payments` row; the delivery keeps the
//! running `paid_naira` and the method and time of the latest payment.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DispenserPayment, EngineError, PaymentType, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenserDelivery {
    pub id: Uuid,
    pub day_id: Uuid,
    pub customer_name: String,
    pub bottles: i64,
    pub amount_naira: i64,
    pub paid_naira: i64,
    pub payment_method: Option<PaymentType>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl DispenserDelivery {
    pub fn new(
        day_id: Uuid,
        customer_name: String,
        bottles: i64,
        amount_naira: i64,
        created_by: String,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if bottles <= 0 {
            return Err(EngineError::InvalidAmount("bottles must be > 0".to_string()));
        }
        if amount_naira < 0 {
            return Err(EngineError::InvalidAmount(
                "amount_naira must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            day_id,
            customer_name,
            bottles,
            amount_naira,
            paid_naira: 0,
            payment_method: None,
            paid_at: None,
            created_by,
            created_at: now,
        })
    }

    pub fn balance_naira(&self) -> i64 {
        self.amount_naira - self.paid_naira
    }

    /// Apply a payment; it may not push `paid_naira` above `amount_naira`.
    pub fn pay(
        &mut self,
        amount_naira: i64,
        method: PaymentType,
        created_by: String,
        now: DateTime<Utc>,
    ) -> ResultEngine<DispenserPayment> {
        if amount_naira <= 0 {
            return Err(EngineError::InvalidAmount(
                "payment must be > 0".to_string(),
            ));
        }
        if amount_naira > self.balance_naira() {
            return Err(EngineError::Validation(format!(
                "payment of {amount_naira} exceeds balance of {}",
                self.balance_naira()
            )));
        }
        self.paid_naira += amount_naira;
        self.payment_method = Some(method);
        self.paid_at = Some(now);
        Ok(DispenserPayment {
            id: Uuid::new_v4(),
            delivery_id: self.id,
            amount_naira,
            method,
            paid_at: now,
            created_by,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dispenser_deliveries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub customer_name: String,
    pub bottles: i64,
    pub amount_naira: i64,
    pub paid_naira: i64,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTimeUtc>,
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

impl From<&DispenserDelivery> for ActiveModel {
    fn from(value: &DispenserDelivery) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            customer_name: ActiveValue::Set(value.customer_name.clone()),
            bottles: ActiveValue::Set(value.bottles),
            amount_naira: ActiveValue::Set(value.amount_naira),
            paid_naira: ActiveValue::Set(value.paid_naira),
            payment_method: ActiveValue::Set(
                value.payment_method.map(|m| m.as_str().to_string()),
            ),
            paid_at: ActiveValue::Set(value.paid_at),
            created_by: ActiveValue::Set(value.created_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for DispenserDelivery {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "dispenser delivery")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            customer_name: model.customer_name,
            bottles: model.bottles,
            amount_naira: model.amount_naira,
            paid_naira: model.paid_naira,
            payment_method: model
                .payment_method
                .as_deref()
                .map(PaymentType::try_from)
                .transpose()?,
            paid_at: model.paid_at,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn delivery() -> DispenserDelivery {
        DispenserDelivery::new(
            Uuid::new_v4(),
            "Grace Hotel".to_string(),
            12,
            6_000,
            "ada".to_string(),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn partial_payments_accumulate() {
        let mut delivery = delivery();
        let paid_at = Utc.timestamp_opt(3_600, 0).unwrap();
        let cash = delivery
            .pay(2_000, PaymentType::Cash, "ada".to_string(), paid_at)
            .unwrap();
        let transfer = delivery
            .pay(1_000, PaymentType::Transfer, "ada".to_string(), paid_at)
            .unwrap();

        assert_eq!((cash.amount_naira, cash.method), (2_000, PaymentType::Cash));
        assert_eq!(transfer.delivery_id, delivery.id);
        assert_ne!(cash.id, transfer.id);
        assert_eq!(delivery.paid_naira, 3_000);
        assert_eq!(delivery.balance_naira(), 3_000);
        assert_eq!(delivery.payment_method, Some(PaymentType::Transfer));
        assert_eq!(delivery.paid_at, Some(paid_at));
    }

    #[test]
    fn overpayment_is_rejected() {
        let mut delivery = delivery();
        let err = delivery
            .pay(
                6_001,
                PaymentType::Cash,
                "ada".to_string(),
                Utc.timestamp_opt(0, 0).unwrap(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("payment of 6001 exceeds balance of 6000".to_string())
        );
        assert_eq!(delivery.paid_naira, 0);
    }
}
