//! Day lifecycle: `OPEN` → `CLOSED`, with owner-granted unlock windows.
//!
//! The engine never looks up an implicit "current day" on its own: callers
//! resolve the day once per request (`get_or_create_today` or `current_day`)
//! and pass its id to every other operation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Actor, AuditEntry, CashFigures, DayRecord, DayStatus, EngineError, InventoryDay,
    Notification, NotificationKind, ResultEngine, Severity, days, driver_days, is_business_day,
    util::{local_date, normalize_required_text},
};

use super::{Engine, with_tx};

/// Everything a dashboard needs to show about one day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DaySummary {
    pub day: DayRecord,
    pub is_editable: bool,
    pub is_pending_unlock: bool,
    pub driver_days: u64,
    pub cash: CashFigures,
    pub inventory: InventoryDay,
}

impl Engine {
    /// Find today's day record, creating it (status `OPEN`) if absent.
    ///
    /// Returns `Ok(None)` on Sundays: no day is ever created for the rest day.
    /// Creation is idempotent per date: a concurrent creator loses the insert
    /// and both callers get the same row.
    pub async fn get_or_create_today(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<Option<DayRecord>> {
        let today = local_date(now, self.timezone);
        if let Some(day) = self.day_by_date(today).await? {
            return Ok(Some(day));
        }
        if !is_business_day(today) {
            tracing::debug!(%today, "no business day on sunday");
            return Ok(None);
        }

        let candidate = DayRecord::new(today, actor.id.clone(), now);
        let (day, created) = with_tx!(self, |db_tx| {
            let inserted = days::Entity::insert(days::ActiveModel::from(&candidate))
                .on_conflict(
                    OnConflict::column(days::Column::Date)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
            let day = self
                .find_day_by_date(&db_tx, today)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("day not exists".to_string()))?;
            if inserted > 0 {
                self.ensure_inventory_day(&db_tx, &day, now).await?;
            }
            Ok((day, inserted > 0))
        })?;

        if created {
            tracing::info!(date = %day.date, "day opened");
            self.record(AuditEntry::new(actor, "day", day.id, "open", now).new_state(&day))
                .await;
        }
        Ok(Some(day))
    }

    /// The most recently dated day record, if any.
    pub async fn current_day(&self) -> ResultEngine<Option<DayRecord>> {
        days::Entity::find()
            .order_by_desc(days::Column::Date)
            .one(&self.database)
            .await?
            .map(DayRecord::try_from)
            .transpose()
    }

    pub async fn day(&self, day_id: Uuid) -> ResultEngine<DayRecord> {
        with_tx!(self, |db_tx| self.require_day(&db_tx, day_id).await)
    }

    pub async fn day_by_date(&self, date: NaiveDate) -> ResultEngine<Option<DayRecord>> {
        with_tx!(self, |db_tx| self.find_day_by_date(&db_tx, date).await)
    }

    pub(super) async fn find_day_by_date(
        &self,
        db: &DatabaseTransaction,
        date: NaiveDate,
    ) -> ResultEngine<Option<DayRecord>> {
        days::Entity::find()
            .filter(days::Column::Date.eq(date))
            .one(db)
            .await?
            .map(DayRecord::try_from)
            .transpose()
    }

    /// The latest day strictly before `date`, used for carried-over figures.
    pub(super) async fn previous_day(
        &self,
        db: &DatabaseTransaction,
        date: NaiveDate,
    ) -> ResultEngine<Option<DayRecord>> {
        days::Entity::find()
            .filter(days::Column::Date.lt(date))
            .order_by_desc(days::Column::Date)
            .one(db)
            .await?
            .map(DayRecord::try_from)
            .transpose()
    }

    /// `true` when the day is `OPEN` or inside an active unlock window.
    pub async fn is_editable(&self, day_id: Uuid, now: DateTime<Utc>) -> ResultEngine<bool> {
        Ok(self.day(day_id).await?.is_editable(now))
    }

    /// Close a day. Closing an already closed day simply overwrites the
    /// closing stamp.
    pub async fn close_day(
        &self,
        day_id: Uuid,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DayRecord> {
        let (old, new) = with_tx!(self, |db_tx| {
            let old = self.require_day(&db_tx, day_id).await?;
            // Last live refresh of the stock figures before the day freezes.
            self.refresh_inventory(&db_tx, &old, now).await?;

            let mut new = old.clone();
            new.status = DayStatus::Closed;
            new.closed_at = Some(now);
            new.closed_by = Some(actor.id.clone());
            days::ActiveModel::from(&new).update(&db_tx).await?;
            Ok((old, new))
        })?;

        if old.status == DayStatus::Closed {
            tracing::debug!(date = %new.date, "day closed again");
        } else {
            tracing::info!(date = %new.date, by = %actor.id, "day closed");
        }
        self.record(
            AuditEntry::new(actor, "day", day_id, "close", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    /// Ask the owner to reopen a closed day. Does not grant access by itself.
    pub async fn request_unlock(
        &self,
        day_id: Uuid,
        reason: &str,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DayRecord> {
        let reason = normalize_required_text(reason, "unlock reason")?;
        let (old, new) = with_tx!(self, |db_tx| {
            let old = self.require_day(&db_tx, day_id).await?;
            if old.status != DayStatus::Closed {
                return Err(EngineError::Validation(format!(
                    "day {} is not closed",
                    old.date
                )));
            }

            let mut new = old.clone();
            new.unlock_request_reason = Some(reason.clone());
            new.unlock_requested_by = Some(actor.id.clone());
            new.unlock_requested_at = Some(now);
            days::ActiveModel::from(&new).update(&db_tx).await?;

            self.notify(
                &db_tx,
                Notification::for_day(
                    NotificationKind::UnlockRequest,
                    Severity::Warning,
                    format!("{} asks to reopen {}: {reason}", actor.id, new.date),
                    day_id,
                    now,
                ),
            )
            .await?;
            Ok((old, new))
        })?;

        tracing::info!(date = %new.date, by = %actor.id, "unlock requested");
        self.record(
            AuditEntry::new(actor, "day", day_id, "request_unlock", now)
                .old(&old)
                .new_state(&new)
                .reason(reason),
        )
        .await;
        Ok(new)
    }

    /// Grant an edit window of `minutes` starting now.
    ///
    /// Status and the stored request stay untouched: the window alone
    /// governs access.
    pub async fn approve_unlock(
        &self,
        day_id: Uuid,
        minutes: i64,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DayRecord> {
        if minutes <= 0 {
            return Err(EngineError::Validation(
                "unlock window must be at least one minute".to_string(),
            ));
        }
        let (old, new) = with_tx!(self, |db_tx| {
            let old = self.require_day(&db_tx, day_id).await?;
            if old.unlock_request_reason.is_none() {
                return Err(EngineError::Validation(format!(
                    "no unlock request for day {}",
                    old.date
                )));
            }

            let mut new = old.clone();
            new.unlock_window_until = Some(now + Duration::minutes(minutes));
            new.unlock_approved_by = Some(actor.id.clone());
            days::ActiveModel::from(&new).update(&db_tx).await?;
            Ok((old, new))
        })?;

        tracing::info!(date = %new.date, minutes, by = %actor.id, "unlock approved");
        self.record(
            AuditEntry::new(actor, "day", day_id, "approve_unlock", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    /// Days with an unlock request and no active grant, oldest first.
    pub async fn unlock_queue(&self, now: DateTime<Utc>) -> ResultEngine<Vec<DayRecord>> {
        let models = days::Entity::find()
            .filter(days::Column::UnlockRequestReason.is_not_null())
            .order_by_asc(days::Column::Date)
            .all(&self.database)
            .await?;
        let mut out = Vec::new();
        for model in models {
            let day = DayRecord::try_from(model)?;
            if day.is_pending_unlock(now) {
                out.push(day);
            }
        }
        Ok(out)
    }

    pub async fn day_summary(&self, day_id: Uuid, now: DateTime<Utc>) -> ResultEngine<DaySummary> {
        let day = self.day(day_id).await?;
        let driver_days = driver_days::Entity::find()
            .filter(driver_days::Column::DayId.eq(day_id.to_string()))
            .count(&self.database)
            .await?;
        let cash = self.cash_stats(day_id).await?;
        let inventory = self.inventory_day(day_id, now).await?;
        Ok(DaySummary {
            is_editable: day.is_editable(now),
            is_pending_unlock: day.is_pending_unlock(now),
            day,
            driver_days,
            cash,
            inventory,
        })
    }
}
