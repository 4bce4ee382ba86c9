//! Store error definitions.

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::model::{ColumnViolation, Entity, RecordId};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a `Store` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matches the key.
    #[error("{entity} with {key} not found")]
    NotFound { entity: &'static str, key: String },

    /// Delete blocked by rows that still point at this one.
    #[error("{entity} with id {id} cannot be deleted: still referenced")]
    Referenced { entity: &'static str, id: RecordId },

    /// Unique, foreign key or column-limit violation.
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn missing<E: Entity>(id: RecordId) -> Self {
        Self::NotFound {
            entity: E::NAME,
            key: format!("id {id}"),
        }
    }

    pub fn referenced<E: Entity>(id: RecordId) -> Self {
        Self::Referenced { entity: E::NAME, id }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(message.clone().unwrap_or_else(|| failure.to_string()))
            }
            other => Self::Sqlite(other),
        }
    }
}

impl From<ColumnViolation> for StoreError {
    fn from(err: ColumnViolation) -> Self {
        Self::Constraint(err.to_string())
    }
}
