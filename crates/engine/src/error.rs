//! The module contains the error the engine can throw.
//!
//! The errors are grouped the way callers handle them:
//!
//! - [`Forbidden`] the actor is not allowed to perform the action.
//! - [`KeyNotFound`] thrown when a referenced row is absent.
//! - [`ExistingKey`] thrown when a natural key is already taken.
//! - [`InvalidAmount`], [`Validation`] and [`DayClosed`] for business-rule
//!   violations; they abort the whole mutation.
//!
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`Validation`]: EngineError::Validation
//!  [`DayClosed`]: EngineError::DayClosed
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unauthorized: {0}")]
    Forbidden(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Day {0} is closed for editing")]
    DayClosed(String),
    #[error("No business day on {0}")]
    NoBusinessDay(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::DayClosed(a), Self::DayClosed(b)) => a == b,
            (Self::NoBusinessDay(a), Self::NoBusinessDay(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl EngineError {
    /// Turn a unique-index violation into `conflict`; any other database
    /// error passes through unchanged.
    pub(crate) fn on_unique_violation(err: DbErr, conflict: impl FnOnce() -> Self) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Database};

    use super::*;

    #[tokio::test]
    async fn unique_violations_become_the_given_conflict() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.execute_unprepared("CREATE TABLE gate_passes (code TEXT NOT NULL UNIQUE)")
            .await
            .unwrap();
        db.execute_unprepared("INSERT INTO gate_passes (code) VALUES ('GP-001')")
            .await
            .unwrap();
        let err = db
            .execute_unprepared("INSERT INTO gate_passes (code) VALUES ('GP-001')")
            .await
            .unwrap_err();

        let err = EngineError::on_unique_violation(err, || {
            EngineError::ExistingKey("GP-001".to_string())
        });
        assert_eq!(err, EngineError::ExistingKey("GP-001".to_string()));
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err = EngineError::on_unique_violation(DbErr::Custom("boom".to_string()), || {
            EngineError::ExistingKey("driver day".to_string())
        });
        assert_eq!(err, EngineError::Database(DbErr::Custom("boom".to_string())));
    }
}
