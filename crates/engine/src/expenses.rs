//! Day expenses paid out of the cash drawer, each awaiting owner review.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Queried,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Queried => "QUERIED",
        }
    }
}

impl TryFrom<&str> for ReviewStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "QUERIED" => Ok(Self::Queried),
            other => Err(EngineError::Validation(format!(
                "invalid review status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub day_id: Uuid,
    pub category: String,
    pub description: Option<String>,
    pub amount_naira: i64,
    pub owner_reviewed_status: ReviewStatus,
    pub review_note: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        day_id: Uuid,
        category: String,
        description: Option<String>,
        amount_naira: i64,
        created_by: String,
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
            category,
            description,
            amount_naira,
            owner_reviewed_status: ReviewStatus::Pending,
            review_note: None,
            reviewed_by: None,
            reviewed_at: None,
            created_by,
            created_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub category: String,
    pub description: Option<String>,
    pub amount_naira: i64,
    pub owner_reviewed_status: String,
    pub review_note: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTimeUtc>,
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

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            category: ActiveValue::Set(value.category.clone()),
            description: ActiveValue::Set(value.description.clone()),
            amount_naira: ActiveValue::Set(value.amount_naira),
            owner_reviewed_status: ActiveValue::Set(
                value.owner_reviewed_status.as_str().to_string(),
            ),
            review_note: ActiveValue::Set(value.review_note.clone()),
            reviewed_by: ActiveValue::Set(value.reviewed_by.clone()),
            reviewed_at: ActiveValue::Set(value.reviewed_at),
            created_by: ActiveValue::Set(value.created_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            category: model.category,
            description: model.description,
            amount_naira: model.amount_naira,
            owner_reviewed_status: ReviewStatus::try_from(model.owner_reviewed_status.as_str())?,
            review_note: model.review_note,
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
