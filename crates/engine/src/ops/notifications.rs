use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, Notification, NotificationKind, ResultEngine, Severity, notifications};

use super::{Engine, with_tx};

impl Engine {
    /// Insert a day-scoped notification unless one of the same kind already
    /// exists for that day. Returns whether a row was inserted.
    pub(super) async fn notify_once_per_day(
        &self,
        db: &DatabaseTransaction,
        kind: NotificationKind,
        severity: Severity,
        message: String,
        day_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<bool> {
        let exists = notifications::Entity::find()
            .filter(notifications::Column::Kind.eq(kind.as_str()))
            .filter(notifications::Column::DayId.eq(day_id.to_string()))
            .one(db)
            .await?
            .is_some();
        if exists {
            return Ok(false);
        }
        self.notify(db, Notification::for_day(kind, severity, message, day_id, now))
            .await?;
        Ok(true)
    }

    pub(super) async fn notify(
        &self,
        db: &DatabaseTransaction,
        notification: Notification,
    ) -> ResultEngine<()> {
        tracing::warn!(
            kind = notification.kind.as_str(),
            severity = notification.severity.as_str(),
            "{}",
            notification.message
        );
        notifications::ActiveModel::from(&notification)
            .insert(db)
            .await?;
        Ok(())
    }

    /// Notifications, newest first.
    pub async fn notifications(&self, unread_only: bool) -> ResultEngine<Vec<Notification>> {
        let mut query = notifications::Entity::find();
        if unread_only {
            query = query.filter(notifications::Column::ReadAt.is_null());
        }
        let models = query
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Notification::try_from).collect()
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<Notification> {
        with_tx!(self, |db_tx| {
            let model = notifications::Entity::find_by_id(notification_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("notification not exists".to_string()))?;
            if model.read_at.is_some() {
                return Notification::try_from(model);
            }
            let mut active: notifications::ActiveModel = model.into();
            active.read_at = ActiveValue::Set(Some(now));
            let updated = active.update(&db_tx).await?;
            Notification::try_from(updated)
        })
    }
}
