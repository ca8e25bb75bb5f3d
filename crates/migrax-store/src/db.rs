//! Database connection management
//!
//! Provides utilities for opening SQLite connections and holding one for
//! the duration of a command.

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|e| from_rusqlite("open", e))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| from_rusqlite("open", e))
}

/// Configure a connection for migration work
///
/// Foreign keys are enforced so that migrations fail where the schema
/// says they should. File databases switch to WAL.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| from_rusqlite("configure", e))?;

    let is_memory = conn.path().map_or(true, |p| p.is_empty());
    if !is_memory {
        // journal_mode returns the resulting mode as a row
        let _mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| from_rusqlite("configure", e))?;
    }

    Ok(())
}

/// Open and configure the database at `path`, run `f` with it, and close it.
///
/// The connection is released on every exit path: explicitly on success,
/// and by drop when `f` fails (an open transaction is rolled back then).
pub fn with_connection<P, T, F>(path: P, f: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(&mut Connection) -> Result<T>,
{
    let mut conn = open(path)?;
    configure(&conn)?;
    let value = f(&mut conn)?;
    conn.close().map_err(|(_, e)| from_rusqlite("close", e))?;
    Ok(value)
}
