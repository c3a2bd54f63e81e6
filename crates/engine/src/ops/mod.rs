use chrono_tz::Tz;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, Statement, Value};

use crate::ResultEngine;

mod access;
mod audit;
mod cash;
mod days;
mod driver_days;
mod drivers;
mod inventory;
mod notifications;
mod sales;
mod settings;
mod transfers;

pub use audit::AuditFilter;
pub use days::DaySummary;
pub use driver_days::DriverDayDetail;

/// Timezone the business runs in when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Africa::Lagos;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine.
///
/// Stateless between calls: every operation re-reads what it needs from the
/// database inside its own transaction.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    timezone: Tz,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// `SELECT COALESCE(SUM(..), 0) AS sum ...` helper.
pub(crate) async fn sum_query(
    db: &DatabaseTransaction,
    sql: &str,
    values: Vec<Value>,
) -> ResultEngine<i64> {
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), sql, values);
    let row = db.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    timezone: Tz,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Business timezone used to resolve "today" and day boundaries.
    pub fn timezone(mut self, timezone: Tz) -> EngineBuilder {
        self.timezone = timezone;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            timezone: self.timezone,
        })
    }
}
