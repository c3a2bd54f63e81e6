use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, AuditEntry, DayRecord, EngineError, InventoryDay, InventoryUpdate, NotificationKind,
    ResultEngine, Severity, inventory_days,
    recompute::InventoryFigures,
    util::{ensure_non_negative, normalize_optional_text},
};

use super::{Engine, sum_query, with_tx};

impl Engine {
    /// Stock figures of a day. While the day is editable the derived figures
    /// are refreshed from the current trips and office sales.
    pub async fn inventory_day(&self, day_id: Uuid, now: DateTime<Utc>) -> ResultEngine<InventoryDay> {
        with_tx!(self, |db_tx| {
            let day = self.require_day(&db_tx, day_id).await?;
            if day.is_editable(now) {
                self.refresh_inventory(&db_tx, &day, now).await
            } else {
                self.ensure_inventory_day(&db_tx, &day, now).await
            }
        })
    }

    /// Set the direct inputs of the day's stock. Everything else is rederived.
    pub async fn update_inventory(
        &self,
        day_id: Uuid,
        update: InventoryUpdate,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<InventoryDay> {
        if let Some(produced) = update.produced_bags {
            ensure_non_negative(produced, "produced_bags")?;
        }
        if let Some(spoilage) = update.spoilage_bags {
            ensure_non_negative(spoilage, "spoilage_bags")?;
        }
        if let Some(confirmed) = update.closing_bags_confirmed {
            ensure_non_negative(confirmed, "closing_bags_confirmed")?;
            if update.clear_closing_bags_confirmed {
                return Err(EngineError::Validation(
                    "cannot both set and clear closing_bags_confirmed".to_string(),
                ));
            }
        }

        let (old, new) = with_tx!(self, |db_tx| {
            let day = self.require_editable_day(&db_tx, day_id, now).await?;
            let old = self.ensure_inventory_day(&db_tx, &day, now).await?;

            let mut edited = old.clone();
            if let Some(produced) = update.produced_bags {
                edited.produced_bags = produced;
            }
            if let Some(spoilage) = update.spoilage_bags {
                edited.spoilage_bags = spoilage;
            }
            if update.closing_bags_confirmed.is_some() || update.clear_closing_bags_confirmed {
                edited.closing_bags_confirmed = update.closing_bags_confirmed;
            }
            if let Some(notes) = update.notes.as_deref() {
                edited.notes = normalize_optional_text(Some(notes));
            }
            let new = self.write_inventory(&db_tx, &day, edited, now).await?;
            Ok((old, new))
        })?;

        tracing::info!(
            day = %day_id,
            closing = new.closing_bags_computed,
            variance = new.variance_bags,
            "inventory updated"
        );
        self.record(
            AuditEntry::new(actor, "inventory_day", new.id, "update", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    /// Load the day's inventory row, creating it with the prior day's
    /// confirmed closing as opening stock.
    pub(super) async fn ensure_inventory_day(
        &self,
        db: &DatabaseTransaction,
        day: &DayRecord,
        now: DateTime<Utc>,
    ) -> ResultEngine<InventoryDay> {
        if let Some(existing) = self.find_inventory_day(db, day.id).await? {
            return Ok(existing);
        }

        let opening = match self.previous_day(db, day.date).await? {
            Some(previous) => self
                .find_inventory_day(db, previous.id)
                .await?
                .and_then(|inventory| inventory.closing_bags_confirmed)
                .unwrap_or(0),
            None => 0,
        };
        let inventory = InventoryDay::new(day.id, opening, now);
        inventory_days::ActiveModel::from(&inventory)
            .insert(db)
            .await?;
        Ok(inventory)
    }

    /// Re-derive outgoing stock from the day's trips and office sales.
    pub(super) async fn refresh_inventory(
        &self,
        db: &DatabaseTransaction,
        day: &DayRecord,
        now: DateTime<Utc>,
    ) -> ResultEngine<InventoryDay> {
        let inventory = self.ensure_inventory_day(db, day, now).await?;
        let before = inventory.clone();
        let refreshed = self.write_inventory(db, day, inventory, now).await?;
        if refreshed.closing_bags_computed != before.closing_bags_computed {
            tracing::debug!(
                day = %day.id,
                closing = refreshed.closing_bags_computed,
                "inventory refreshed"
            );
        }
        Ok(refreshed)
    }

    /// Rederive and store the figures of `inventory`. A variance past the
    /// alert threshold notifies once per day, whichever write exposed it.
    async fn write_inventory(
        &self,
        db: &DatabaseTransaction,
        day: &DayRecord,
        mut inventory: InventoryDay,
        now: DateTime<Utc>,
    ) -> ResultEngine<InventoryDay> {
        let day_id = inventory.day_id.to_string();
        let driver_loads = sum_query(
            db,
            "SELECT COALESCE(SUM(loaded_bags), 0) AS sum FROM trips WHERE day_id = ?",
            vec![day_id.clone().into()],
        )
        .await?;
        let office_sales = sum_query(
            db,
            "SELECT COALESCE(SUM(bags), 0) AS sum FROM office_sales WHERE day_id = ?",
            vec![day_id.into()],
        )
        .await?;

        let figures = InventoryFigures::compute(
            inventory.opening_bags,
            inventory.produced_bags,
            inventory.spoilage_bags,
            driver_loads,
            office_sales,
            inventory.closing_bags_confirmed,
        );
        inventory.apply(&figures);
        inventory.updated_at = now;

        let mut active_model = inventory_days::ActiveModel::from(&inventory);
        active_model.id = ActiveValue::Unchanged(inventory.id.to_string());
        active_model.day_id = ActiveValue::Unchanged(inventory.day_id.to_string());
        active_model.opening_bags = ActiveValue::Unchanged(inventory.opening_bags);
        active_model.update(db).await?;

        if figures.needs_alert() {
            self.notify_once_per_day(
                db,
                NotificationKind::InventoryVariance,
                Severity::Warning,
                format!(
                    "Stock variance of {} bags on {}",
                    figures.variance_bags, day.date
                ),
                day.id,
                now,
            )
            .await?;
        }
        Ok(inventory)
    }

    async fn find_inventory_day(
        &self,
        db: &DatabaseTransaction,
        day_id: Uuid,
    ) -> ResultEngine<Option<InventoryDay>> {
        inventory_days::Entity::find()
            .filter(inventory_days::Column::DayId.eq(day_id.to_string()))
            .one(db)
            .await?
            .map(InventoryDay::try_from)
            .transpose()
    }
}
