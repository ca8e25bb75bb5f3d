//! Transactional applier
//!
//! Applies one migration file inside one transaction:
//! `Begin -> Executing(i) -> {Committed | RolledBack}`.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, MigrateError, Result};
use crate::ledger;
use migrax_core::checksum::compute_checksum;
use migrax_core::config::MigratorConfig;
use migrax_core::model::{ApplyResult, MigrationFile};
use migrax_core::naming::migration_name;
use migrax_core::tokenizer::tokenize;
use migrax_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use std::time::Instant;

/// Apply `file` and record it in the ledger.
///
/// Statement failures come back as [`ApplyResult::Failed`] after the
/// transaction has been rolled back. `Err` is reserved for failures of
/// the transaction itself or of the ledger write, in which case nothing
/// was committed either.
pub fn apply_migration(
    conn: &mut Connection,
    file: &MigrationFile,
    config: &MigratorConfig,
) -> Result<ApplyResult> {
    let start = Instant::now();
    log_op_start!("apply", filename = file.filename.as_str());

    let statements = tokenize(&file.raw_sql);
    let tx = conn
        .transaction()
        .map_err(|e| from_rusqlite("begin", e))?;

    for statement in &statements {
        if let Err(e) = tx.execute_batch(&statement.text) {
            let error = MigrateError::StatementExecution {
                filename: file.filename.clone(),
                statement_index: statement.index,
                statement_text: statement.text.clone(),
                cause: e.to_string(),
            };
            tx.rollback().map_err(|e| from_rusqlite("rollback", e))?;

            log_op_error!(
                "apply",
                error.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                filename = file.filename.as_str(),
                statement_index = statement.index,
                line = statement.line
            );
            return Ok(ApplyResult::Failed {
                statement_index: statement.index,
                error,
            });
        }
    }

    let checksum = compute_checksum(&file.raw_sql);
    let entry = match ledger::record(
        &tx,
        &config.ledger_table,
        &file.filename,
        &migration_name(&file.filename, config),
        Some(&checksum),
    ) {
        Ok(entry) => entry,
        Err(e) => {
            // Dropping the transaction rolls it back
            log_op_error!(
                "apply",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                filename = file.filename.as_str()
            );
            return Err(e);
        }
    };

    tx.commit().map_err(|e| from_rusqlite("commit", e))?;

    log_op_end!(
        "apply",
        duration_ms = start.elapsed().as_millis() as u64,
        filename = file.filename.as_str(),
        statement_count = statements.len(),
        ledger_id = entry.id
    );

    Ok(ApplyResult::Committed {
        entry,
        statement_count: statements.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Connection, MigratorConfig) {
        let conn = Connection::open_in_memory().unwrap();
        let config = MigratorConfig::default();
        ledger::ensure_schema(&conn, &config.ledger_table).unwrap();
        (conn, config)
    }

    fn table_count(conn: &Connection, name: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_commit_records_entry_with_checksum() {
        let (mut conn, config) = setup();
        let file = MigrationFile::new(
            "1_users.sql",
            "CREATE TABLE users (id INTEGER PRIMARY KEY);\nINSERT INTO users VALUES (1);",
        );

        let result = apply_migration(&mut conn, &file, &config).unwrap();
        let (entry, count) = result.into_result().unwrap();

        assert_eq!(count, 2);
        assert_eq!(entry.filename, "1_users.sql");
        assert_eq!(entry.name, "1_users");
        assert_eq!(entry.checksum, Some(compute_checksum(&file.raw_sql)));
        assert_eq!(table_count(&conn, "users"), 1);
    }

    #[test]
    fn test_failure_rolls_back_everything() {
        let (mut conn, config) = setup();
        let file = MigrationFile::new(
            "1_bad.sql",
            "CREATE TABLE t1 (id INTEGER);\nINSERT INTO missing VALUES (1);\nCREATE TABLE t3 (id INTEGER);",
        );

        let result = apply_migration(&mut conn, &file, &config).unwrap();
        match result {
            ApplyResult::Failed {
                statement_index,
                error,
            } => {
                assert_eq!(statement_index, 1);
                match error {
                    MigrateError::StatementExecution {
                        filename,
                        statement_text,
                        cause,
                        ..
                    } => {
                        assert_eq!(filename, "1_bad.sql");
                        assert_eq!(statement_text, "INSERT INTO missing VALUES (1)");
                        assert!(cause.contains("no such table"));
                    }
                    other => panic!("unexpected error: {:?}", other),
                }
            }
            other => panic!("expected failure, got {:?}", other),
        }

        assert_eq!(table_count(&conn, "t1"), 0);
        assert_eq!(table_count(&conn, "t3"), 0);
        assert!(!ledger::has_executed(&conn, &config.ledger_table, "1_bad.sql").unwrap());
    }

    #[test]
    fn test_empty_migration_commits() {
        let (mut conn, config) = setup();
        let file = MigrationFile::new("1_empty.sql", ";;;   ;");

        let result = apply_migration(&mut conn, &file, &config).unwrap();
        assert!(result.is_committed());
        assert!(ledger::has_executed(&conn, &config.ledger_table, "1_empty.sql").unwrap());
    }

    #[test]
    fn test_duplicate_rolls_back_statements() {
        let (mut conn, config) = setup();
        ledger::record(&conn, &config.ledger_table, "1_dup.sql", "1_dup", None).unwrap();
        let file = MigrationFile::new("1_dup.sql", "CREATE TABLE dup (id INTEGER);");

        let err = apply_migration(&mut conn, &file, &config).unwrap_err();
        assert!(matches!(err, MigrateError::DuplicateLedgerEntry { .. }));
        assert_eq!(table_count(&conn, "dup"), 0);
    }

    #[test]
    fn test_row_returning_statement_is_allowed() {
        let (mut conn, config) = setup();
        let file = MigrationFile::new("1_select.sql", "SELECT 1;\nPRAGMA user_version;");

        assert!(apply_migration(&mut conn, &file, &config)
            .unwrap()
            .is_committed());
    }
}
