//! SQLite storage bootstrap, schema creation and the shared session handle.
//!
//! # Responsibility
//! - Open and configure SQLite connections for warehouse core.
//! - Create the relational schema idempotently before any data access.
//! - Own the connection as a [`Session`] shared by repositories and units of work.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Repositories never see a connection whose schema is not fully applied.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod session;

pub use open::{open_session, open_session_in_memory, open_session_with};
pub use session::Session;

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening, bootstrapping or closing storage.
#[derive(Debug)]
pub enum DbError {
    /// The SQLite engine rejected a call.
    Engine(rusqlite::Error),
    /// The file carries a warehouse schema newer than this build understands.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "storage engine error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "warehouse schema v{found} is newer than this build (supports up to v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Engine(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Engine(err)
    }
}
