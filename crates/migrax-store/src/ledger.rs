//! Migration ledger
//!
//! One row per applied migration, ordered by an autoincrement id. The
//! table name comes from configuration and is validated as a plain
//! identifier; it is always interpolated double-quoted so keywords such
//! as `order` work too.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, is_unique_violation, MigrateError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use migrax_core::model::LedgerEntry;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Whether the ledger table exists
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(|e| MigrateError::LedgerUnavailable {
        reason: e.to_string(),
    })
}

/// Create the ledger table if it does not exist
pub fn ensure_schema(conn: &Connection, table: &str) -> Result<()> {
    let ident = quoted(table);
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {ident} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            filename TEXT NOT NULL UNIQUE,
            executed_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            checksum TEXT
        )"
    ))
    .map_err(|e| MigrateError::LedgerUnavailable {
        reason: format!("cannot create table '{}': {}", table, e),
    })
}

/// All ledger entries in apply order
pub fn list_executed(conn: &Connection, table: &str) -> Result<Vec<LedgerEntry>> {
    let ident = quoted(table);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, name, filename, executed_at, checksum FROM {ident} ORDER BY id ASC"
        ))
        .map_err(|e| ledger_read_error(table, e))?;
    let entries = stmt
        .query_map([], entry_from_row)
        .map_err(|e| ledger_read_error(table, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ledger_read_error(table, e))?;
    Ok(entries)
}

/// Filenames of all applied migrations, in apply order.
///
/// A ledger table that does not exist yet has no entries.
pub fn list_executed_filenames(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let ident = quoted(table);
    if !table_exists(conn, table)? {
        return Ok(Vec::new());
    }
    let mut stmt = conn
        .prepare(&format!("SELECT filename FROM {ident} ORDER BY id ASC"))
        .map_err(|e| ledger_read_error(table, e))?;
    let filenames = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| ledger_read_error(table, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ledger_read_error(table, e))?;
    Ok(filenames)
}

/// Whether `filename` is recorded
pub fn has_executed(conn: &Connection, table: &str, filename: &str) -> Result<bool> {
    let ident = quoted(table);
    conn.query_row(
        &format!("SELECT 1 FROM {ident} WHERE filename = ?1"),
        [filename],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(|e| ledger_read_error(table, e))
}

/// Insert a ledger row and return it as stored.
///
/// Call inside the migration's transaction so the row commits or rolls
/// back together with the migration's statements.
pub fn record(
    conn: &Connection,
    table: &str,
    filename: &str,
    name: &str,
    checksum: Option<&str>,
) -> Result<LedgerEntry> {
    let ident = quoted(table);
    conn.execute(
        &format!("INSERT INTO {ident} (name, filename, checksum) VALUES (?1, ?2, ?3)"),
        params![name, filename, checksum],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            MigrateError::DuplicateLedgerEntry {
                filename: filename.to_string(),
            }
        } else {
            from_rusqlite("record", e)
        }
    })?;

    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT id, name, filename, executed_at, checksum FROM {ident} WHERE id = ?1"),
        [id],
        entry_from_row,
    )
    .map_err(|e| from_rusqlite("record", e))
}

/// Most recently applied entry, if any
pub fn last_entry(conn: &Connection, table: &str) -> Result<Option<LedgerEntry>> {
    let ident = quoted(table);
    conn.query_row(
        &format!(
            "SELECT id, name, filename, executed_at, checksum FROM {ident} ORDER BY id DESC LIMIT 1"
        ),
        [],
        entry_from_row,
    )
    .optional()
    .map_err(|e| ledger_read_error(table, e))
}

/// Delete and return the most recently applied entry, if any
pub fn remove_last(conn: &Connection, table: &str) -> Result<Option<LedgerEntry>> {
    let ident = quoted(table);
    let Some(entry) = last_entry(conn, table)? else {
        return Ok(None);
    };
    conn.execute(&format!("DELETE FROM {ident} WHERE id = ?1"), [entry.id])
        .map_err(|e| from_rusqlite("remove_last", e))?;
    Ok(Some(entry))
}

fn quoted(table: &str) -> String {
    format!("\"{}\"", table.replace('"', "\"\""))
}

fn ledger_read_error(table: &str, err: rusqlite::Error) -> MigrateError {
    MigrateError::LedgerUnavailable {
        reason: format!("cannot read table '{}': {}", table, err),
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    let executed_at: String = row.get(3)?;
    Ok(LedgerEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        filename: row.get(2)?,
        executed_at: parse_timestamp(&executed_at).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
        })?,
        checksum: row.get(4)?,
    })
}

/// Parse SQLite's `CURRENT_TIMESTAMP` format (UTC), falling back to RFC 3339
/// for rows written by other tools
fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    match NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        Ok(naive) => Ok(Utc.from_utc_datetime(&naive)),
        Err(_) => DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)),
    }
}
