//! Office sales, dispenser deliveries and drawer expenses.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, AuditEntry, DispenserDelivery, DispenserDeliveryCmd, DispenserPayment, EngineError,
    Expense, ExpenseCmd, OfficeSale, OfficeSaleCmd, PaymentType, ResultEngine, ReviewStatus,
    dispenser_deliveries, dispenser_payments, expenses, office_sales,
    util::{local_date, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record an over-the-counter sale and refresh the day's stock figures.
    pub async fn add_office_sale(
        &self,
        cmd: OfficeSaleCmd,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<OfficeSale> {
        let sale = with_tx!(self, |db_tx| {
            let day = self.require_editable_day(&db_tx, cmd.day_id, now).await?;
            let price_per_bag = match cmd.price_per_bag {
                Some(price) => price,
                None => self.load_rates(&db_tx).await?.retail_price_per_bag,
            };
            let sale = OfficeSale::new(
                day.id,
                normalize_optional_text(cmd.customer_name.as_deref()),
                cmd.bags,
                price_per_bag,
                cmd.payment_type,
                actor.id.clone(),
                now,
            )?;
            office_sales::ActiveModel::from(&sale).insert(&db_tx).await?;
            self.refresh_inventory(&db_tx, &day, now).await?;
            Ok(sale)
        })?;

        self.record(AuditEntry::new(actor, "office_sale", sale.id, "create", now).new_state(&sale))
            .await;
        Ok(sale)
    }

    pub async fn office_sales(&self, day_id: Uuid) -> ResultEngine<Vec<OfficeSale>> {
        let models = office_sales::Entity::find()
            .filter(office_sales::Column::DayId.eq(day_id.to_string()))
            .order_by_asc(office_sales::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(OfficeSale::try_from).collect()
    }

    pub async fn add_dispenser_delivery(
        &self,
        cmd: DispenserDeliveryCmd,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DispenserDelivery> {
        let customer_name = normalize_required_text(&cmd.customer_name, "customer name")?;
        let delivery = with_tx!(self, |db_tx| {
            self.require_editable_day(&db_tx, cmd.day_id, now).await?;
            let delivery = DispenserDelivery::new(
                cmd.day_id,
                customer_name,
                cmd.bottles,
                cmd.amount_naira,
                actor.id.clone(),
                now,
            )?;
            dispenser_deliveries::ActiveModel::from(&delivery)
                .insert(&db_tx)
                .await?;
            Ok(delivery)
        })?;

        self.record(
            AuditEntry::new(actor, "dispenser_delivery", delivery.id, "create", now)
                .new_state(&delivery),
        )
        .await;
        Ok(delivery)
    }

    /// Take a payment against a dispenser delivery.
    ///
    /// Each payment is stored on its own and counts toward the cash of the
    /// day it is received on, so that day (if it exists) must still be
    /// editable. Earlier payments keep their own day and method.
    pub async fn record_dispenser_payment(
        &self,
        delivery_id: Uuid,
        amount_naira: i64,
        method: PaymentType,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<DispenserDelivery> {
        let today = local_date(now, self.timezone);
        let (old, new) = with_tx!(self, |db_tx| {
            if let Some(day) = self.find_day_by_date(&db_tx, today).await? {
                day.ensure_editable(now)?;
            }
            let old = self.require_dispenser_delivery(&db_tx, delivery_id).await?;
            let mut new = old.clone();
            let payment = new.pay(amount_naira, method, actor.id.clone(), now)?;
            dispenser_payments::ActiveModel::from(&payment)
                .insert(&db_tx)
                .await?;

            let active_model = dispenser_deliveries::ActiveModel {
                id: ActiveValue::Unchanged(delivery_id.to_string()),
                paid_naira: ActiveValue::Set(new.paid_naira),
                payment_method: ActiveValue::Set(Some(method.as_str().to_string())),
                paid_at: ActiveValue::Set(new.paid_at),
                ..Default::default()
            };
            active_model.update(&db_tx).await?;
            Ok((old, new))
        })?;

        tracing::info!(
            delivery = %delivery_id,
            amount = amount_naira,
            balance = new.balance_naira(),
            "dispenser payment recorded"
        );
        self.record(
            AuditEntry::new(actor, "dispenser_delivery", delivery_id, "payment", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    pub async fn dispenser_deliveries(&self, day_id: Uuid) -> ResultEngine<Vec<DispenserDelivery>> {
        let models = dispenser_deliveries::Entity::find()
            .filter(dispenser_deliveries::Column::DayId.eq(day_id.to_string()))
            .order_by_asc(dispenser_deliveries::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(DispenserDelivery::try_from).collect()
    }

    pub async fn dispenser_payments(
        &self,
        delivery_id: Uuid,
    ) -> ResultEngine<Vec<DispenserPayment>> {
        let models = dispenser_payments::Entity::find()
            .filter(dispenser_payments::Column::DeliveryId.eq(delivery_id.to_string()))
            .order_by_asc(dispenser_payments::Column::PaidAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(DispenserPayment::try_from).collect()
    }

    pub async fn add_expense(
        &self,
        cmd: ExpenseCmd,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<Expense> {
        let category = normalize_required_text(&cmd.category, "expense category")?;
        let expense = with_tx!(self, |db_tx| {
            self.require_editable_day(&db_tx, cmd.day_id, now).await?;
            let expense = Expense::new(
                cmd.day_id,
                category,
                normalize_optional_text(cmd.description.as_deref()),
                cmd.amount_naira,
                actor.id.clone(),
                now,
            )?;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            Ok(expense)
        })?;

        self.record(AuditEntry::new(actor, "expense", expense.id, "create", now).new_state(&expense))
            .await;
        Ok(expense)
    }

    /// Owner review of an expense. Allowed on closed days: the review does
    /// not change any figure of the day.
    pub async fn review_expense(
        &self,
        expense_id: Uuid,
        status: ReviewStatus,
        note: Option<&str>,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<Expense> {
        if status == ReviewStatus::Pending {
            return Err(EngineError::Validation(
                "review must approve or query the expense".to_string(),
            ));
        }
        let note = normalize_optional_text(note);
        let (old, new) = with_tx!(self, |db_tx| {
            let old = self.require_expense(&db_tx, expense_id).await?;
            let active_model = expenses::ActiveModel {
                id: ActiveValue::Unchanged(expense_id.to_string()),
                owner_reviewed_status: ActiveValue::Set(status.as_str().to_string()),
                review_note: ActiveValue::Set(note.clone()),
                reviewed_by: ActiveValue::Set(Some(actor.id.clone())),
                reviewed_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            };
            let new = Expense::try_from(active_model.update(&db_tx).await?)?;
            Ok((old, new))
        })?;

        self.record(
            AuditEntry::new(actor, "expense", expense_id, "review", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }

    pub async fn expenses(&self, day_id: Uuid) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::DayId.eq(day_id.to_string()))
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }
}
