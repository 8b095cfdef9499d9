//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Resolve a connection string into a database location.
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and run migrations before returning.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const MEMORY_URIS: &[&str] = &[":memory:", "sqlite::memory:", "sqlite://:memory:"];
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a connection string points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

impl DbLocation {
    /// Parses a connection string.
    ///
    /// Accepted forms: `:memory:`, `sqlite::memory:`, `sqlite://<path>`,
    /// `sqlite:<path>` and a bare filesystem path.
    pub fn parse(uri: &str) -> DbResult<Self> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidUri("connection string is empty".to_string()));
        }
        if MEMORY_URIS.contains(&trimmed) {
            return Ok(Self::Memory);
        }

        let path = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);
        if path.is_empty() {
            return Err(DbError::InvalidUri(format!(
                "`{trimmed}` does not name a database file"
            )));
        }

        Ok(Self::File(PathBuf::from(path)))
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }
}

/// Opens the database named by a connection string and applies migrations.
///
/// # Errors
/// - `DbError::InvalidUri` when the string is empty or names no file.
/// - Any open/bootstrap failure from [`open_db`] or [`open_db_in_memory`].
pub fn open_db_from_uri(uri: &str) -> DbResult<Connection> {
    let location = DbLocation::parse(uri).map_err(|err| {
        error!("event=db_open module=db status=error error_code=invalid_uri error={err}");
        err
    })?;
    match location {
        DbLocation::Memory => open_db_in_memory(),
        DbLocation::File(path) => open_db(path),
    }
}

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let location = DbLocation::File(path.as_ref().to_path_buf());
    open_with(&location, || Connection::open(path.as_ref()))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(&DbLocation::Memory, Connection::open_in_memory)
}

fn open_with(
    location: &DbLocation,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = location.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
