//! The module contains `DayRecord`, the unit of work for one calendar date.
//!
//! A day is either `OPEN` or `CLOSED`. Editability is derived, not stored:
//! a closed day becomes editable again while an owner-granted unlock window
//! is active, without its status ever changing.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Open,
    Closed,
}

impl DayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl TryFrom<&str> for DayStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            other => Err(EngineError::Validation(format!(
                "invalid day status: {other}"
            ))),
        }
    }
}

/// Sunday is the rest day: no `DayRecord` is ever created for it.
pub fn is_business_day(date: NaiveDate) -> bool {
    date.weekday() != Weekday::Sun
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub status: DayStatus,
    pub opened_by: String,
    pub opened_at: DateTime<Utc>,
    pub closed_by: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub unlock_request_reason: Option<String>,
    pub unlock_requested_by: Option<String>,
    pub unlock_requested_at: Option<DateTime<Utc>>,
    pub unlock_approved_by: Option<String>,
    pub unlock_window_until: Option<DateTime<Utc>>,
}

impl DayRecord {
    pub fn new(date: NaiveDate, opened_by: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            status: DayStatus::Open,
            opened_by: opened_by.into(),
            opened_at: now,
            closed_by: None,
            closed_at: None,
            unlock_request_reason: None,
            unlock_requested_by: None,
            unlock_requested_at: None,
            unlock_approved_by: None,
            unlock_window_until: None,
        }
    }

    /// An unlock window is active strictly before `unlock_window_until`.
    pub fn unlock_window_active(&self, now: DateTime<Utc>) -> bool {
        self.unlock_window_until.is_some_and(|until| now < until)
    }

    /// `OPEN`, or `CLOSED` with an active unlock window.
    pub fn is_editable(&self, now: DateTime<Utc>) -> bool {
        self.status == DayStatus::Open || self.unlock_window_active(now)
    }

    /// Requested but without an active grant (never granted, or expired).
    pub fn is_pending_unlock(&self, now: DateTime<Utc>) -> bool {
        self.unlock_request_reason.is_some()
            && self.unlock_window_until.is_none_or(|until| until <= now)
    }

    pub fn ensure_editable(&self, now: DateTime<Utc>) -> ResultEngine<()> {
        if !self.is_editable(now) {
            return Err(EngineError::DayClosed(self.date.to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "day_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub date: Date,
    pub status: String,
    pub opened_by: String,
    pub opened_at: DateTimeUtc,
    pub closed_by: Option<String>,
    pub closed_at: Option<DateTimeUtc>,
    pub unlock_request_reason: Option<String>,
    pub unlock_requested_by: Option<String>,
    pub unlock_requested_at: Option<DateTimeUtc>,
    pub unlock_approved_by: Option<String>,
    pub unlock_window_until: Option<DateTimeUtc>,
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

impl From<&DayRecord> for ActiveModel {
    fn from(day: &DayRecord) -> Self {
        Self {
            id: ActiveValue::Set(day.id.to_string()),
            date: ActiveValue::Set(day.date),
            status: ActiveValue::Set(day.status.as_str().to_string()),
            opened_by: ActiveValue::Set(day.opened_by.clone()),
            opened_at: ActiveValue::Set(day.opened_at),
            closed_by: ActiveValue::Set(day.closed_by.clone()),
            closed_at: ActiveValue::Set(day.closed_at),
            unlock_request_reason: ActiveValue::Set(day.unlock_request_reason.clone()),
            unlock_requested_by: ActiveValue::Set(day.unlock_requested_by.clone()),
            unlock_requested_at: ActiveValue::Set(day.unlock_requested_at),
            unlock_approved_by: ActiveValue::Set(day.unlock_approved_by.clone()),
            unlock_window_until: ActiveValue::Set(day.unlock_window_until),
        }
    }
}

impl TryFrom<Model> for DayRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "day")?,
            date: model.date,
            status: DayStatus::try_from(model.status.as_str())?,
            opened_by: model.opened_by,
            opened_at: model.opened_at,
            closed_by: model.closed_by,
            closed_at: model.closed_at,
            unlock_request_reason: model.unlock_request_reason,
            unlock_requested_by: model.unlock_requested_by,
            unlock_requested_at: model.unlock_requested_at,
            unlock_approved_by: model.unlock_approved_by,
            unlock_window_until: model.unlock_window_until,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn day() -> DayRecord {
        DayRecord::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), "ada", now())
    }

    #[test]
    fn open_day_is_editable() {
        let day = day();
        assert!(day.is_editable(now()));
        assert!(!day.is_pending_unlock(now()));
    }

    #[test]
    fn closed_day_is_read_only() {
        let mut day = day();
        day.status = DayStatus::Closed;
        assert!(!day.is_editable(now()));
        assert_eq!(
            day.ensure_editable(now()),
            Err(EngineError::DayClosed("2026-10-19".to_string()))
        );
    }

    #[test]
    fn unlock_window_expires_exactly_at_deadline() {
        let mut day = day();
        day.status = DayStatus::Closed;
        day.unlock_request_reason = Some("late receipt".to_string());
        day.unlock_window_until = Some(now() + Duration::minutes(30));

        assert!(day.is_editable(now()));
        assert!(day.is_editable(now() + Duration::minutes(29)));
        assert!(!day.is_editable(now() + Duration::minutes(30)));
        assert_eq!(day.status, DayStatus::Closed);
    }

    #[test]
    fn pending_unlock_tracks_grant_expiry() {
        let mut day = day();
        day.status = DayStatus::Closed;
        day.unlock_request_reason = Some("typo in trip".to_string());
        assert!(day.is_pending_unlock(now()));

        day.unlock_window_until = Some(now() + Duration::minutes(10));
        assert!(!day.is_pending_unlock(now()));
        assert!(day.is_pending_unlock(now() + Duration::minutes(10)));
    }

    #[test]
    fn sunday_is_not_a_business_day() {
        assert!(!is_business_day(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()));
        assert!(is_business_day(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
    }
}
