use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, AuditEntry, DriverDay, EngineError, ResultEngine, TransferCmd, TransferLog,
    TransferStatus, TransferTarget, transfer_logs,
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Log a claimed bank transfer against the day.
    ///
    /// The claim counts as received as soon as it is logged, before any
    /// statement matching. A driver-linked claim recomputes that driver day.
    pub async fn add_transfer(
        &self,
        cmd: TransferCmd,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<(TransferLog, Option<DriverDay>)> {
        let transfer = TransferLog::new(
            cmd.day_id,
            cmd.target,
            cmd.amount_naira,
            normalize_optional_text(cmd.sender_name.as_deref()),
            normalize_optional_text(cmd.reference.as_deref()),
            actor.id.clone(),
            now,
        )?;
        let driver_day = with_tx!(self, |db_tx| {
            self.require_editable_day(&db_tx, cmd.day_id, now).await?;

            let linked_driver_day = match cmd.target {
                TransferTarget::DriverDay(id) => {
                    let driver_day = self.require_driver_day(&db_tx, id).await?;
                    if driver_day.day_id != cmd.day_id {
                        return Err(EngineError::Validation(
                            "driver day belongs to another day".to_string(),
                        ));
                    }
                    Some(driver_day)
                }
                TransferTarget::OfficeSale(id) => {
                    if !self.office_sale_exists_in_day(&db_tx, cmd.day_id, id).await? {
                        return Err(EngineError::KeyNotFound(
                            "office sale not exists".to_string(),
                        ));
                    }
                    None
                }
                TransferTarget::DispenserDelivery(id) => {
                    let delivery = self.require_dispenser_delivery(&db_tx, id).await?;
                    if delivery.day_id != cmd.day_id {
                        return Err(EngineError::Validation(
                            "dispenser delivery belongs to another day".to_string(),
                        ));
                    }
                    None
                }
                TransferTarget::Unlinked => None,
            };

            transfer_logs::ActiveModel::from(&transfer)
                .insert(&db_tx)
                .await?;

            match linked_driver_day {
                Some(driver_day) => Ok(Some(self.recompute_in_tx(&db_tx, driver_day, now).await?)),
                None => Ok(None),
            }
        })?;

        tracing::info!(
            transfer = %transfer.id,
            amount = transfer.amount_naira,
            "transfer claimed"
        );
        self.record(
            AuditEntry::new(actor, "transfer", transfer.id, "create", now).new_state(&transfer),
        )
        .await;
        Ok((transfer, driver_day))
    }

    /// Manual matching outcome. Does not change what counts as received.
    pub async fn set_transfer_status(
        &self,
        transfer_id: Uuid,
        status: TransferStatus,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<TransferLog> {
        let (old, new) = with_tx!(self, |db_tx| {
            let old = self.require_transfer(&db_tx, transfer_id).await?;
            let active_model = transfer_logs::ActiveModel {
                id: ActiveValue::Unchanged(transfer_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            let new = TransferLog::try_from(active_model.update(&db_tx).await?)?;
            Ok((old, new))
        })?;

        self.record(
            AuditEntry::new(actor, "transfer", transfer_id, "set_status", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    pub async fn transfers(&self, day_id: Uuid) -> ResultEngine<Vec<TransferLog>> {
        let models = transfer_logs::Entity::find()
            .filter(transfer_logs::Column::DayId.eq(day_id.to_string()))
            .order_by_asc(transfer_logs::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(TransferLog::try_from).collect()
    }
}
