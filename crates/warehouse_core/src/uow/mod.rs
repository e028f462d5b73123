//! Unit of work over one storage session.
//!
//! # Responsibility
//! - Bound a sequence of repository writes to one commit/rollback decision.
//! - Release the transactional scope on every exit path.
//!
//! # Invariants
//! - Writes staged through any repository sharing the session are visible
//!   to reads on that session immediately, and durable only after `commit`.
//! - A failed `commit` leaves the batch open; the caller must `rollback`.
//! - Dropping the unit of work discards writes that were never committed.
//! - A session is owned by at most one unit of work; a second `begin`
//!   fails until the first scope is released.
//!
//! # State machine
//! `Open -> Committed -> Open` and `Open -> RolledBack -> Open`: the next
//! staged write after a commit or rollback opens a fresh batch.

use crate::db::Session;
use crate::repo::error::{RepoError, RepoResult};
use log::{error, info, warn};
use rusqlite::ErrorCode;
use std::cell::Cell;
use std::time::Instant;

/// Observable state of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOfWorkState {
    /// Writes accepted; nothing decided since the last commit or rollback.
    Open,
    /// Last decision was a successful commit and nothing has been staged since.
    Committed,
    /// Last decision was a rollback and nothing has been staged since.
    RolledBack,
}

/// Transaction boundary contract used by orchestration code.
pub trait UnitOfWork {
    fn commit(&self) -> RepoResult<()>;
    fn rollback(&self) -> RepoResult<()>;
    fn state(&self) -> UnitOfWorkState;
}

/// Unit of work bound to a SQLite [`Session`].
///
/// ```rust,ignore
/// let session = open_session_in_memory()?;
/// let products = SqliteProductRepository::new(&session);
/// let uow = SqliteUnitOfWork::begin(&session)?;
/// let id = products.add(&Product::new("Widget", 10, 9.99, 1))?;
/// uow.commit()?;
/// ```
pub struct SqliteUnitOfWork<'s> {
    session: &'s Session,
    last_decision: Cell<UnitOfWorkState>,
    released: Cell<bool>,
}

impl<'s> SqliteUnitOfWork<'s> {
    /// Enters a unit-of-work scope on `session`.
    ///
    /// # Errors
    /// - `ScopeActive` while another unit of work still owns the session.
    pub fn begin(session: &'s Session) -> RepoResult<Self> {
        if !session.claim_scope() {
            warn!("event=uow_begin module=uow status=error error_code=scope_active");
            return Err(RepoError::ScopeActive);
        }
        info!(
            "event=uow_begin module=uow status=ok pending={}",
            session.has_pending_writes()
        );
        Ok(Self {
            session,
            last_decision: Cell::new(UnitOfWorkState::Open),
            released: Cell::new(false),
        })
    }

    /// Leaves the scope, discarding uncommitted writes, and reports failures.
    ///
    /// Dropping the value performs the same release but can only log errors.
    pub fn close(self) -> RepoResult<()> {
        self.release()
    }

    fn release(&self) -> RepoResult<()> {
        if self.released.replace(true) {
            return Ok(());
        }
        let discarded = if self.session.has_pending_writes() {
            warn!("event=uow_release module=uow status=discarded reason=uncommitted_writes");
            self.session.rollback_pending()
        } else {
            Ok(())
        };
        self.session.release_scope();
        discarded?;
        info!("event=uow_release module=uow status=ok");
        Ok(())
    }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn commit(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.session.commit_pending() {
            Ok(()) => {
                self.last_decision.set(UnitOfWorkState::Committed);
                info!(
                    "event=uow_commit module=uow status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
                error!(
                    "event=uow_commit module=uow status=error error_code=persistence_conflict duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(RepoError::PersistenceConflict(err.to_string()))
            }
            Err(err) => {
                error!(
                    "event=uow_commit module=uow status=error error_code=commit_failed duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn rollback(&self) -> RepoResult<()> {
        let discarded = self.session.has_pending_writes();
        self.session.rollback_pending()?;
        self.last_decision.set(UnitOfWorkState::RolledBack);
        info!("event=uow_rollback module=uow status=ok discarded={discarded}");
        Ok(())
    }

    fn state(&self) -> UnitOfWorkState {
        if self.session.has_pending_writes() {
            UnitOfWorkState::Open
        } else {
            self.last_decision.get()
        }
    }
}

impl Drop for SqliteUnitOfWork<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            error!("event=uow_release module=uow status=error error={err}");
        }
    }
}

/// Runs `work` inside a unit-of-work scope on `session`.
///
/// The scope is always released afterwards, so anything `work` staged but
/// did not commit is discarded. An error from `work` takes precedence over
/// a release error.
pub fn with_unit_of_work<T, E>(
    session: &Session,
    work: impl FnOnce(&SqliteUnitOfWork<'_>) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<RepoError>,
{
    let uow = SqliteUnitOfWork::begin(session)?;
    let outcome = work(&uow);
    let released = uow.close();
    let value = outcome?;
    released?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{SqliteUnitOfWork, UnitOfWork, UnitOfWorkState};
    use crate::db::open_session_in_memory;

    fn stage_product(session: &crate::db::Session) {
        session
            .stage(|conn| -> rusqlite::Result<()> {
                conn.execute(
                    "INSERT INTO products (name, quantity, price, category) VALUES ('x', 1, 1.0, 1);",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn state_follows_commit_and_rollback_cycles() {
        let session = open_session_in_memory().unwrap();
        let uow = SqliteUnitOfWork::begin(&session).unwrap();
        assert_eq!(uow.state(), UnitOfWorkState::Open);

        stage_product(&session);
        assert!(session.has_pending_writes());
        uow.commit().unwrap();
        assert_eq!(uow.state(), UnitOfWorkState::Committed);

        stage_product(&session);
        assert_eq!(uow.state(), UnitOfWorkState::Open);
        uow.rollback().unwrap();
        assert_eq!(uow.state(), UnitOfWorkState::RolledBack);
        assert!(!session.has_pending_writes());
    }

    #[test]
    fn commit_and_rollback_without_pending_writes_are_noops() {
        let session = open_session_in_memory().unwrap();
        let uow = SqliteUnitOfWork::begin(&session).unwrap();
        uow.commit().unwrap();
        uow.rollback().unwrap();
        uow.close().unwrap();
    }

    #[test]
    fn session_accepts_a_new_scope_once_the_owner_is_released() {
        let session = open_session_in_memory().unwrap();
        let owner = SqliteUnitOfWork::begin(&session).unwrap();
        assert!(matches!(
            SqliteUnitOfWork::begin(&session),
            Err(crate::repo::error::RepoError::ScopeActive)
        ));

        owner.close().unwrap();
        let next = SqliteUnitOfWork::begin(&session).unwrap();
        assert_eq!(next.state(), UnitOfWorkState::Open);
    }
}
