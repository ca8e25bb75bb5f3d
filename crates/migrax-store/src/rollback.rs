//! Rollback executor
//!
//! Undoes exactly one ledger entry per call: the most recent one.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, MigrateError, Result};
use crate::ledger;
use crate::source::MigrationSource;
use migrax_core::config::MigratorConfig;
use migrax_core::model::RollbackResult;
use migrax_core::naming::rollback_filename;
use migrax_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use std::time::Instant;

/// Roll back the most recently applied migration.
///
/// Runs the paired down script, if the source has one, and removes the
/// ledger entry in the same transaction. Without a down script only the
/// entry is removed: the schema is not restored. A failing down script
/// keeps the entry.
pub fn rollback_last(
    conn: &mut Connection,
    source: &dyn MigrationSource,
    config: &MigratorConfig,
) -> Result<RollbackResult> {
    let start = Instant::now();
    log_op_start!("rollback_last");

    let result = run(conn, source, config);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(RollbackResult::NothingToRollback) => {
            log_op_end!("rollback_last", duration_ms = duration_ms, outcome = "nothing_to_rollback");
        }
        Ok(RollbackResult::RolledBack { entry, down_script }) => {
            log_op_end!(
                "rollback_last",
                duration_ms = duration_ms,
                outcome = "rolled_back",
                filename = entry.filename.as_str(),
                ledger_id = entry.id,
                down_script = down_script.as_deref().unwrap_or("")
            );
        }
        Err(e) => {
            log_op_error!("rollback_last", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn run(
    conn: &mut Connection,
    source: &dyn MigrationSource,
    config: &MigratorConfig,
) -> Result<RollbackResult> {
    let table = config.ledger_table.as_str();
    if !ledger::table_exists(conn, table)? {
        return Ok(RollbackResult::NothingToRollback);
    }
    let Some(last) = ledger::last_entry(conn, table)? else {
        return Ok(RollbackResult::NothingToRollback);
    };

    let down_name = rollback_filename(&last.filename, config);
    let down_sql = if source.exists(&down_name) {
        Some(source.read(&down_name)?)
    } else {
        tracing::warn!(
            component = module_path!(),
            op = "rollback_last",
            filename = last.filename.as_str(),
            down_script = down_name.as_str(),
            "no down script; removing ledger entry without reverting schema"
        );
        None
    };

    let tx = conn
        .transaction()
        .map_err(|e| from_rusqlite("begin", e))?;

    if let Some(sql) = &down_sql {
        tx.execute_batch(sql)
            .map_err(|e| MigrateError::RollbackExecution {
                filename: down_name.clone(),
                cause: e.to_string(),
            })?;
    }

    let removed = ledger::remove_last(&tx, table)?;
    tx.commit().map_err(|e| from_rusqlite("commit", e))?;

    match removed {
        Some(entry) => Ok(RollbackResult::RolledBack {
            entry,
            down_script: down_sql.map(|_| down_name),
        }),
        None => Ok(RollbackResult::NothingToRollback),
    }
}
