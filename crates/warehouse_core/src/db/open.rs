//! Session bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Create the schema before handing out a usable [`Session`].
//!
//! # Invariants
//! - Returned sessions have `foreign_keys=ON`.
//! - Returned sessions have the schema fully applied.

use super::migrations::apply_migrations;
use super::{DbResult, Session};
use crate::config::StorageTarget;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file and creates the schema if absent.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_session(path: impl AsRef<Path>) -> DbResult<Session> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory database with the schema applied.
pub fn open_session_in_memory() -> DbResult<Session> {
    open_with("memory", Connection::open_in_memory)
}

/// Opens the storage named by a parsed connection string.
pub fn open_session_with(target: &StorageTarget) -> DbResult<Session> {
    match target {
        StorageTarget::Memory => open_session_in_memory(),
        StorageTarget::File(path) => open_session(path),
    }
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Session> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        err
    })?;

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(Session::new(conn))
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
