//! Error types for the estate store.
//!
//! Absence of a row is not an error: lookups return `Option` and
//! update/delete report whether anything matched. Everything in this enum
//! is a rejected or failed operation.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// A type alias for `Result<T, StoreError>`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors produced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (duplicate email,
    /// duplicate favorite, second profile for the same user).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// A value supplied by the caller is outside its domain. Raised before
    /// any statement reaches the database.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// A stored value could not be decoded into its application type.
    #[error("corrupt value in {table}.{column}: {reason}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        reason: String,
    },

    /// Structured data could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Email/password pair did not match a local account.
    #[error("invalid email or password")]
    Authentication,

    /// Connection, migration or any other database failure.
    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl StoreError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        StoreError::InvalidValue {
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error is a uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => StoreError::MissingReference(msg),
            _ => StoreError::Database(err),
        }
    }
}
