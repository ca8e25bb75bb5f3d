//! Migration discovery
//!
//! Lists the apply set of a source and diffs it against the ledger.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::ledger;
use crate::source::MigrationSource;
use migrax_core::config::MigratorConfig;
use migrax_core::model::MigrationFile;
use migrax_core::naming::is_migration_file;
use rusqlite::Connection;
use std::collections::HashSet;

/// Filenames in the apply set, in apply order.
///
/// Keeps entries with the configured extension, drops down scripts, and
/// sorts by byte-wise comparison of the full filename.
pub fn list_migration_files(
    source: &dyn MigrationSource,
    config: &MigratorConfig,
) -> Result<Vec<String>> {
    let mut names: Vec<String> = source
        .list_entries()?
        .into_iter()
        .filter(|name| is_migration_file(name, config))
        .collect();
    names.sort();
    Ok(names)
}

/// Filenames in the apply set that are not in `executed`, in apply order
pub fn pending_filenames(all: Vec<String>, executed: &[String]) -> Vec<String> {
    let executed: HashSet<&str> = executed.iter().map(String::as_str).collect();
    all.into_iter()
        .filter(|name| !executed.contains(name.as_str()))
        .collect()
}

/// Pending migrations with their contents, in apply order.
///
/// The ledger table must already exist.
pub fn list_pending_files(
    conn: &Connection,
    source: &dyn MigrationSource,
    config: &MigratorConfig,
) -> Result<Vec<MigrationFile>> {
    let executed = ledger::list_executed_filenames(conn, &config.ledger_table)?;
    let all = list_migration_files(source, config)?;

    pending_filenames(all, &executed)
        .into_iter()
        .map(|filename| {
            let raw_sql = source.read(&filename)?;
            Ok(MigrationFile::new(filename, raw_sql))
        })
        .collect()
}
