use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Actor, AuditEntry, Driver, EngineError, ResultEngine, drivers,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a driver. Names are unique (case-insensitive).
    pub async fn new_driver(
        &self,
        name: &str,
        motor_boy_name: Option<&str>,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<Driver> {
        let name = normalize_required_text(name, "driver name")?;
        let driver = Driver::new(name, normalize_optional_text(motor_boy_name), now);
        with_tx!(self, |db_tx| {
            let exists = drivers::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(driver.name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(driver.name.clone()));
            }
            drivers::ActiveModel::from(&driver).insert(&db_tx).await?;
            Ok(())
        })?;

        self.record(
            AuditEntry::new(actor, "driver", driver.id, "create", now).new_state(&driver),
        )
        .await;
        Ok(driver)
    }

    pub async fn drivers(&self, active_only: bool) -> ResultEngine<Vec<Driver>> {
        let mut query = drivers::Entity::find();
        if active_only {
            query = query.filter(drivers::Column::Active.eq(true));
        }
        let models = query
            .order_by_asc(drivers::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Driver::try_from).collect()
    }

    /// Inactive drivers keep their history but cannot be opened on new days.
    pub async fn set_driver_active(
        &self,
        driver_id: Uuid,
        active: bool,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> ResultEngine<Driver> {
        let (old, new) = with_tx!(self, |db_tx| {
            let old = self.require_driver(&db_tx, driver_id).await?;
            let active_model = drivers::ActiveModel {
                id: ActiveValue::Unchanged(driver_id.to_string()),
                active: ActiveValue::Set(active),
                ..Default::default()
            };
            let updated = Driver::try_from(active_model.update(&db_tx).await?)?;
            Ok((old, updated))
        })?;

        self.record(
            AuditEntry::new(actor, "driver", driver_id, "set_active", now)
                .old(&old)
                .new_state(&new),
        )
        .await;
        Ok(new)
    }
}
