//! Errors raised by the record-keeping services.

use thiserror::Error;

use crate::db::DbError;
use crate::resolver::ResolverError;

/// Errors from visit recording and patient management.
#[derive(Error, Debug)]
pub enum RecordError {
    /// A required field is missing or malformed; nothing was persisted.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Store failure, surfaced unchanged.
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl RecordError {
    pub(crate) fn visit_not_found(id: i64) -> Self {
        RecordError::NotFound { entity: "visit", id }
    }

    pub(crate) fn patient_not_found(id: i64) -> Self {
        RecordError::NotFound { entity: "patient", id }
    }
}

impl From<ResolverError> for RecordError {
    fn from(e: ResolverError) -> Self {
        match e {
            ResolverError::InvalidInput(msg) => RecordError::Validation(msg),
            ResolverError::Database(e) => RecordError::Database(e),
        }
    }
}

impl From<rusqlite::Error> for RecordError {
    fn from(e: rusqlite::Error) -> Self {
        RecordError::Database(e.into())
    }
}

pub type RecordResult<T> = Result<T, RecordError>;
