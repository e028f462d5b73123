//! Repository and unit-of-work error type.

use crate::db::DbError;
use crate::model::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from repository reads/writes and unit-of-work boundaries.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// `get` matched zero rows, or more than one.
    NotFound { entity: &'static str, id: EntityId },
    /// `add` referenced a nested entity that storage does not hold.
    ReferencedEntityNotFound { entity: &'static str, id: EntityId },
    /// `commit` violated a storage constraint; the batch must be rolled back.
    PersistenceConflict(String),
    /// A value cannot be mapped between its domain and storage forms.
    InvalidData(String),
    /// `begin` was called while another unit of work owns the session.
    ScopeActive,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ReferencedEntityNotFound { entity, id } => {
                write!(f, "referenced {entity} not found: {id}")
            }
            Self::PersistenceConflict(message) => write!(f, "persistence conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid data: {message}"),
            Self::ScopeActive => write!(f, "session already owned by a unit of work"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::ReferencedEntityNotFound { .. } => None,
            Self::PersistenceConflict(_) => None,
            Self::InvalidData(_) | Self::ScopeActive => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::FromSqlConversionFailure(index, _, err) => {
                Self::InvalidData(format!("column {index}: {err}"))
            }
            rusqlite::Error::IntegralValueOutOfRange(index, value) => {
                Self::InvalidData(format!("column {index}: value {value} out of range"))
            }
            other => Self::Db(DbError::Engine(other)),
        }
    }
}
