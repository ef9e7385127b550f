//! Persistence layer
//!
//! Each store is a trait so handlers and services can run against PostgreSQL in production
//! and in-memory implementations in tests.

pub mod catalog;
pub mod clients;
pub mod requests;

pub use catalog::{PgServiceCatalog, ServiceCatalog};
pub use clients::{ClientStore, PgClientStore};
pub use requests::{PgRequestStore, RequestStore};

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

/// Unique constraint on `cliente.email`
pub const CLIENT_EMAIL_CONSTRAINT: &str = "cliente_email_key";
/// Unique constraint on `cliente.cpf`
pub const CLIENT_CPF_CONSTRAINT: &str = "cliente_cpf_key";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A row was rejected by a storage constraint or could not be coerced to its column type
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Connection, pool or backend failure
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Classify a database error by its SQLSTATE code
    ///
    /// Class 23 (integrity constraint) and class 22 (data exception) mean the submitted data
    /// was rejected; anything else is treated as the backend being unavailable.
    pub fn from_sqlstate(code: Option<&str>, constraint: Option<&str>, message: &str) -> Self {
        match code {
            Some("23505") => StoreError::UniqueViolation {
                constraint: constraint.unwrap_or_default().to_string(),
            },
            Some(code) if code.starts_with("23") || code.starts_with("22") => {
                StoreError::ConstraintViolation(message.to_string())
            }
            _ => StoreError::Unavailable(message.to_string()),
        }
    }

    pub fn is_unique_violation_of(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => StoreError::from_sqlstate(
                db_err.code().as_deref(),
                db_err.constraint(),
                db_err.message(),
            ),
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// Storage liveness check used by the health endpoint
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl HealthProbe for PgPool {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_keeps_constraint_name() {
        let err = StoreError::from_sqlstate(
            Some("23505"),
            Some(CLIENT_CPF_CONSTRAINT),
            "duplicate key value violates unique constraint",
        );
        assert!(err.is_unique_violation_of(CLIENT_CPF_CONSTRAINT));
        assert!(!err.is_unique_violation_of(CLIENT_EMAIL_CONSTRAINT));
    }

    #[test]
    fn test_foreign_key_and_not_null_are_constraint_violations() {
        // 23503 foreign_key_violation, 23502 not_null_violation
        for code in ["23503", "23502"] {
            assert!(matches!(
                StoreError::from_sqlstate(Some(code), None, "rejected"),
                StoreError::ConstraintViolation(_)
            ));
        }
    }

    #[test]
    fn test_malformed_values_are_constraint_violations() {
        // 22007 invalid_datetime_format, 22P02 invalid_text_representation
        for code in ["22007", "22P02"] {
            assert!(matches!(
                StoreError::from_sqlstate(Some(code), None, "bad value"),
                StoreError::ConstraintViolation(_)
            ));
        }
    }

    #[test]
    fn test_other_codes_are_unavailable() {
        assert!(matches!(
            StoreError::from_sqlstate(Some("57P01"), None, "admin shutdown"),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from_sqlstate(None, None, "no code"),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }
}
