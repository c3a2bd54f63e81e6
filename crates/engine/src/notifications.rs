//! Owner-facing notifications. Deduplication (at most one per condition per
//! day) is done by the engine before inserting, never by the table.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    UnlockRequest,
    InventoryVariance,
    CashVariance,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnlockRequest => "UNLOCK_REQUEST",
            Self::InventoryVariance => "INVENTORY_VARIANCE",
            Self::CashVariance => "CASH_VARIANCE",
        }
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "UNLOCK_REQUEST" => Ok(Self::UnlockRequest),
            "INVENTORY_VARIANCE" => Ok(Self::InventoryVariance),
            "CASH_VARIANCE" => Ok(Self::CashVariance),
            other => Err(EngineError::Validation(format!(
                "invalid notification kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl TryFrom<&str> for Severity {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(EngineError::Validation(format!(
                "invalid severity: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub severity: Severity,
    pub message: String,
    pub day_id: Option<Uuid>,
    pub license_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn for_day(
        kind: NotificationKind,
        severity: Severity,
        message: String,
        day_id: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            severity,
            message,
            day_id: Some(day_id),
            license_id: None,
            created_at: now,
            read_at: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub severity: String,
    pub message: String,
    pub day_id: Option<String>,
    pub license_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub read_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Notification> for ActiveModel {
    fn from(value: &Notification) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            severity: ActiveValue::Set(value.severity.as_str().to_string()),
            message: ActiveValue::Set(value.message.clone()),
            day_id: ActiveValue::Set(value.day_id.map(|id| id.to_string())),
            license_id: ActiveValue::Set(value.license_id.clone()),
            created_at: ActiveValue::Set(value.created_at),
            read_at: ActiveValue::Set(value.read_at),
        }
    }
}

impl TryFrom<Model> for Notification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "notification")?,
            kind: NotificationKind::try_from(model.kind.as_str())?,
            severity: Severity::try_from(model.severity.as_str())?,
            message: model.message,
            day_id: model
                .day_id
                .as_deref()
                .map(|id| parse_uuid(id, "day"))
                .transpose()?,
            license_id: model.license_id,
            created_at: model.created_at,
            read_at: model.read_at,
        })
    }
}
