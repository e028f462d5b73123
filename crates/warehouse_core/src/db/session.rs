//! Owned connection handle shared by repositories and units of work.
//!
//! # Responsibility
//! - Own exactly one SQLite connection for its whole lifetime.
//! - Keep every repository write inside a pending batch (open engine
//!   transaction) so nothing becomes durable without an explicit commit.
//!
//! # Invariants
//! - A pending batch is opened lazily before the first staged write.
//! - Each staged write runs under a savepoint: it is applied completely or
//!   not at all, and a failed write never discards earlier staged writes.
//!   A failed first write leaves no batch behind.
//! - At most one unit of work owns the session at a time.
//! - Dropping a session closes the connection; an open batch is discarded
//!   by the engine.

use super::DbResult;
use log::warn;
use rusqlite::Connection;
use std::cell::Cell;

const STAGED_WRITE_SAVEPOINT: &str = "staged_write";

/// Storage session bound to one SQLite connection.
///
/// Repositories and [`crate::uow::SqliteUnitOfWork`] borrow the session, so
/// all of them observe the same pending batch.
pub struct Session {
    conn: Connection,
    scope_claimed: Cell<bool>,
}

impl Session {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn,
            scope_claimed: Cell::new(false),
        }
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs `query` with the connection switched to `query_only`.
    ///
    /// Any write attempted inside the closure fails with a read-only error,
    /// so inspection code cannot bypass the unit-of-work boundary.
    pub fn read<T>(
        &self,
        query: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> rusqlite::Result<T> {
        self.conn.pragma_update(None, "query_only", true)?;
        let outcome = query(&self.conn);
        self.conn.pragma_update(None, "query_only", false)?;
        outcome
    }

    /// Marks the session as owned by a unit of work.
    ///
    /// Returns `false` when another scope already holds it.
    pub(crate) fn claim_scope(&self) -> bool {
        !self.scope_claimed.replace(true)
    }

    pub(crate) fn release_scope(&self) {
        self.scope_claimed.set(false);
    }

    /// Returns whether staged writes are waiting for commit or rollback.
    pub fn has_pending_writes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Runs one repository write inside the pending batch.
    ///
    /// The closure's writes are rolled back to the savepoint when it fails,
    /// and the closure error is returned unchanged.
    pub(crate) fn stage<T, E>(
        &self,
        write: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<rusqlite::Error>,
    {
        let opened_batch = self.conn.is_autocommit();
        if opened_batch {
            self.conn.execute_batch("BEGIN DEFERRED;")?;
        }
        self.conn
            .execute_batch(&format!("SAVEPOINT {STAGED_WRITE_SAVEPOINT};"))?;

        match write(&self.conn) {
            Ok(value) => {
                self.conn
                    .execute_batch(&format!("RELEASE {STAGED_WRITE_SAVEPOINT};"))?;
                Ok(value)
            }
            Err(err) => {
                // A batch opened by this failed write holds nothing else.
                let undo = if opened_batch {
                    "ROLLBACK;".to_string()
                } else {
                    format!(
                        "ROLLBACK TO {STAGED_WRITE_SAVEPOINT}; RELEASE {STAGED_WRITE_SAVEPOINT};"
                    )
                };
                if let Err(undo_err) = self.conn.execute_batch(&undo) {
                    warn!(
                        "event=stage_undo module=db status=error error={}",
                        undo_err
                    );
                }
                Err(err)
            }
        }
    }

    /// Makes the pending batch durable. No-op without pending writes.
    pub(crate) fn commit_pending(&self) -> rusqlite::Result<()> {
        if self.has_pending_writes() {
            self.conn.execute_batch("COMMIT;")?;
        }
        Ok(())
    }

    /// Discards the pending batch. No-op without pending writes.
    pub(crate) fn rollback_pending(&self) -> rusqlite::Result<()> {
        if self.has_pending_writes() {
            self.conn.execute_batch("ROLLBACK;")?;
        }
        Ok(())
    }

    /// Closes the connection, discarding any pending batch.
    pub fn close(self) -> DbResult<()> {
        self.rollback_pending()?;
        self.conn.close().map_err(|(_, err)| err.into())
    }
}
