use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, AuditEntry, CashFigures, CashLedger, DayRecord, Naira, NotificationKind, PaymentType,
    ResultEngine, Severity, cash_ledgers,
    recompute::CASH_VARIANCE_ALERT_NAIRA,
    util::{ensure_non_negative, local_day_bounds},
};

use super::{Engine, sum_query, with_tx};

impl Engine {
    /// Live cash position of a day. Available whatever the day's status.
    pub async fn cash_stats(&self, day_id: Uuid) -> ResultEngine<CashFigures> {
        with_tx!(self, |db_tx| {
            let day = self.require_day(&db_tx, day_id).await?;
            let figures = self.compute_cash(&db_tx, &day).await?;
            Ok(match self.find_cash_ledger(&db_tx, day_id).await? {
                Some(ledger) => figures.with_closing(ledger.closing_cash_naira),
                None => figures,
            })
        })
    }

    pub async fn cash_ledger(&self, day_id: Uuid) -> ResultEngine<Option<CashLedger>> {
        with_tx!(self, |db_tx| self.find_cash_ledger(&db_tx, day_id).await)
    }

    /// Record the physical closing count.
    ///
    /// Figures are recomputed from the store, never taken from an earlier
    /// read, and the day keeps a single ledger row holding the latest count.
    pub async fn submit_closing_cash(
        &self,
        day_id: Uuid,
        closing_cash_naira: i64,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<CashLedger> {
        ensure_non_negative(closing_cash_naira, "closing_cash_naira")?;
        let (old, ledger) = with_tx!(self, |db_tx| {
            let day = self.require_editable_day(&db_tx, day_id, now).await?;
            let figures = self
                .compute_cash(&db_tx, &day)
                .await?
                .with_closing(closing_cash_naira);
            let variance = closing_cash_naira - figures.expected_cash_naira;

            let old = self.find_cash_ledger(&db_tx, day_id).await?;
            let ledger = CashLedger {
                id: old.as_ref().map_or_else(Uuid::new_v4, |l| l.id),
                day_id,
                opening_cash_naira: figures.opening_cash_naira,
                cash_received_naira: figures.cash_in_naira,
                cash_spent_naira: figures.spent_naira,
                closing_cash_naira,
                variance_naira: variance,
                submitted_by: actor.id.clone(),
                submitted_at: now,
            };
            let mut active_model = cash_ledgers::ActiveModel::from(&ledger);
            if old.is_some() {
                active_model.id = ActiveValue::Unchanged(ledger.id.to_string());
                active_model.day_id = ActiveValue::Unchanged(day_id.to_string());
                active_model.update(&db_tx).await?;
            } else {
                active_model.insert(&db_tx).await?;
            }

            if variance.abs() > CASH_VARIANCE_ALERT_NAIRA {
                self.notify_once_per_day(
                    &db_tx,
                    NotificationKind::CashVariance,
                    Severity::Critical,
                    format!(
                        "Cash variance of {} on {}",
                        Naira::new(variance).signed(),
                        day.date
                    ),
                    day_id,
                    now,
                )
                .await?;
            }
            Ok((old, ledger))
        })?;

        tracing::info!(
            day = %day_id,
            closing = ledger.closing_cash_naira,
            variance = ledger.variance_naira,
            "closing cash submitted"
        );
        let entry = AuditEntry::new(actor, "cash_ledger", ledger.id, "submit_closing", now);
        let entry = match &old {
            Some(old) => entry.old(old),
            None => entry,
        };
        self.record(entry.new_state(&ledger)).await;
        Ok(ledger)
    }

    async fn find_cash_ledger(
        &self,
        db: &DatabaseTransaction,
        day_id: Uuid,
    ) -> ResultEngine<Option<CashLedger>> {
        cash_ledgers::Entity::find()
            .filter(cash_ledgers::Column::DayId.eq(day_id.to_string()))
            .one(db)
            .await?
            .map(CashLedger::try_from)
            .transpose()
    }

    /// Opening, inflow and outflow of a day, freshly aggregated.
    async fn compute_cash(
        &self,
        db: &DatabaseTransaction,
        day: &DayRecord,
    ) -> ResultEngine<CashFigures> {
        let opening = match self.previous_day(db, day.date).await? {
            Some(previous) => self
                .find_cash_ledger(db, previous.id)
                .await?
                .map(|ledger| ledger.closing_cash_naira)
                .unwrap_or(0),
            None => 0,
        };

        let day_id = day.id.to_string();
        let drivers = sum_query(
            db,
            "SELECT COALESCE(SUM(cash_received_naira), 0) AS sum \
             FROM driver_days WHERE day_id = ?",
            vec![day_id.clone().into()],
        )
        .await?;
        let office = sum_query(
            db,
            "SELECT COALESCE(SUM(amount_naira), 0) AS sum \
             FROM office_sales WHERE day_id = ? AND payment_type = ?",
            vec![day_id.clone().into(), PaymentType::Cash.as_str().into()],
        )
        .await?;
        let (start, end) = local_day_bounds(day.date, self.timezone);
        let dispenser = sum_query(
            db,
            "SELECT COALESCE(SUM(amount_naira), 0) AS sum \
             FROM dispenser_payments \
             WHERE method = ? AND paid_at >= ? AND paid_at < ?",
            vec![PaymentType::Cash.as_str().into(), start.into(), end.into()],
        )
        .await?;
        let spent = sum_query(
            db,
            "SELECT COALESCE(SUM(amount_naira), 0) AS sum FROM expenses WHERE day_id = ?",
            vec![day_id.into()],
        )
        .await?;

        Ok(CashFigures::new(opening, drivers + office + dispenser, spent))
    }
}
