use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, TransactionTrait, prelude::*};

use crate::{
    Actor, AuditEntry, EngineError, Rates, ResultEngine,
    company_settings::{self, SETTINGS_ROW_ID},
};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn load_rates<C: ConnectionTrait>(&self, db: &C) -> ResultEngine<Rates> {
        let model = company_settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("company settings not exists".to_string()))?;
        Ok(Rates::from(model))
    }

    /// Current unit price and commission rates.
    pub async fn rates(&self) -> ResultEngine<Rates> {
        self.load_rates(&self.database).await
    }

    /// Replace the company rates.
    ///
    /// Driver days that already captured a rate keep it; only driver days
    /// recomputed for the first time pick up the new values.
    pub async fn update_rates(
        &self,
        rates: Rates,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<Rates> {
        rates.validate()?;
        let old = with_tx!(self, |db_tx| {
            let old = self.load_rates(&db_tx).await?;
            company_settings::active_model(&rates, &actor.id, now)
                .update(&db_tx)
                .await?;
            Ok(old)
        })?;

        tracing::info!(
            retail = rates.retail_price_per_bag,
            driver = rates.driver_commission_per_bag,
            motor_boy = rates.motor_boy_commission_per_bag,
            "company rates updated"
        );
        self.record(
            AuditEntry::new(actor, "company_settings", SETTINGS_ROW_ID, "update_rates", now)
                .old(&old)
                .new_state(&rates),
        )
        .await;
        Ok(rates)
    }
}
