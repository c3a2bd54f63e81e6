//! Claimed bank transfers.
//!
//! A transfer is logged when someone says they paid by transfer. It may be
//! linked to a driver day, an office sale or a dispenser delivery. Matching
//! against the bank statement happens later and only moves `status`; a
//! claimed transfer counts toward a driver's received total immediately.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    MatchedAuto,
    MatchedManual,
    NotFound,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::MatchedAuto => "MATCHED_AUTO",
            Self::MatchedManual => "MATCHED_MANUAL",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

impl TryFrom<&str> for TransferStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "MATCHED_AUTO" => Ok(Self::MatchedAuto),
            "MATCHED_MANUAL" => Ok(Self::MatchedManual),
            "NOT_FOUND" => Ok(Self::NotFound),
            other => Err(EngineError::Validation(format!(
                "invalid transfer status: {other}"
            ))),
        }
    }
}

/// What a claimed transfer pays for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TransferTarget {
    DriverDay(Uuid),
    OfficeSale(Uuid),
    DispenserDelivery(Uuid),
    Unlinked,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLog {
    pub id: Uuid,
    pub day_id: Uuid,
    pub target: TransferTarget,
    pub amount_naira: i64,
    pub sender_name: Option<String>,
    pub reference: Option<String>,
    pub status: TransferStatus,
    pub claimed_by: String,
    pub created_at: DateTime<Utc>,
}

impl TransferLog {
    pub fn new(
        day_id: Uuid,
        target: TransferTarget,
        amount_naira: i64,
        sender_name: Option<String>,
        reference: Option<String>,
        claimed_by: String,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_naira <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_naira must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            day_id,
            target,
            amount_naira,
            sender_name,
            reference,
            status: TransferStatus::Pending,
            claimed_by,
            created_at: now,
        })
    }

    pub fn driver_day_id(&self) -> Option<Uuid> {
        match self.target {
            TransferTarget::DriverDay(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transfer_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub driver_day_id: Option<String>,
    pub office_sale_id: Option<String>,
    pub dispenser_delivery_id: Option<String>,
    pub amount_naira: i64,
    pub sender_name: Option<String>,
    pub reference: Option<String>,
    pub status: String,
    pub claimed_by: String,
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

impl From<&TransferLog> for ActiveModel {
    fn from(value: &TransferLog) -> Self {
        let (driver_day_id, office_sale_id, dispenser_delivery_id) = match value.target {
            TransferTarget::DriverDay(id) => (Some(id.to_string()), None, None),
            TransferTarget::OfficeSale(id) => (None, Some(id.to_string()), None),
            TransferTarget::DispenserDelivery(id) => (None, None, Some(id.to_string())),
            TransferTarget::Unlinked => (None, None, None),
        };
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            driver_day_id: ActiveValue::Set(driver_day_id),
            office_sale_id: ActiveValue::Set(office_sale_id),
            dispenser_delivery_id: ActiveValue::Set(dispenser_delivery_id),
            amount_naira: ActiveValue::Set(value.amount_naira),
            sender_name: ActiveValue::Set(value.sender_name.clone()),
            reference: ActiveValue::Set(value.reference.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            claimed_by: ActiveValue::Set(value.claimed_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for TransferLog {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let target = match (
            model.driver_day_id.as_deref(),
            model.office_sale_id.as_deref(),
            model.dispenser_delivery_id.as_deref(),
        ) {
            (Some(id), None, None) => TransferTarget::DriverDay(parse_uuid(id, "driver day")?),
            (None, Some(id), None) => TransferTarget::OfficeSale(parse_uuid(id, "office sale")?),
            (None, None, Some(id)) => {
                TransferTarget::DispenserDelivery(parse_uuid(id, "dispenser delivery")?)
            }
            (None, None, None) => TransferTarget::Unlinked,
            _ => {
                return Err(EngineError::Validation(
                    "transfer linked to more than one target".to_string(),
                ));
            }
        };
        Ok(Self {
            id: parse_uuid(&model.id, "transfer")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            target,
            amount_naira: model.amount_naira,
            sender_name: model.sender_name,
            reference: model.reference,
            status: TransferStatus::try_from(model.status.as_str())?,
            claimed_by: model.claimed_by,
            created_at: model.created_at,
        })
    }
}
