//! Read-only status of ledger versus source

#![allow(clippy::result_large_err)]

use crate::discovery::{list_migration_files, pending_filenames};
use crate::errors::Result;
use crate::ledger;
use crate::source::MigrationSource;
use migrax_core::checksum::compute_checksum;
use migrax_core::config::MigratorConfig;
use migrax_core::model::StatusReport;
use migrax_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use std::time::Instant;

/// Compare the ledger with the source without writing anything.
///
/// A database without a ledger table reports every file as pending.
pub fn migration_status(
    conn: &Connection,
    source: &dyn MigrationSource,
    config: &MigratorConfig,
) -> Result<StatusReport> {
    let start = Instant::now();
    log_op_start!("status");

    let result = build_report(conn, source, config);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => {
            log_op_end!(
                "status",
                duration_ms = duration_ms,
                executed_len = report.executed.len(),
                pending_len = report.pending.len(),
                drifted_len = report.drifted.len(),
                missing_len = report.missing.len()
            );
        }
        Err(e) => {
            log_op_error!("status", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn build_report(
    conn: &Connection,
    source: &dyn MigrationSource,
    config: &MigratorConfig,
) -> Result<StatusReport> {
    let executed = if ledger::table_exists(conn, &config.ledger_table)? {
        ledger::list_executed(conn, &config.ledger_table)?
    } else {
        Vec::new()
    };

    let mut drifted = Vec::new();
    let mut missing = Vec::new();
    for entry in &executed {
        if !source.exists(&entry.filename) {
            missing.push(entry.filename.clone());
            continue;
        }
        // Rows without a checksum cannot drift
        if let Some(recorded) = &entry.checksum {
            let current = compute_checksum(&source.read(&entry.filename)?);
            if &current != recorded {
                drifted.push(entry.filename.clone());
            }
        }
    }

    let executed_names: Vec<String> = executed.iter().map(|e| e.filename.clone()).collect();
    let pending = pending_filenames(list_migration_files(source, config)?, &executed_names);

    Ok(StatusReport {
        executed,
        pending,
        drifted,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn test_status_without_ledger_is_all_pending_and_read_only() {
        let conn = Connection::open_in_memory().unwrap();
        let config = MigratorConfig::default();
        let source = MemorySource::new()
            .with_file("2_b.sql", "SELECT 2;")
            .with_file("1_a.sql", "SELECT 1;");

        let report = migration_status(&conn, &source, &config).unwrap();

        assert!(report.executed.is_empty());
        assert_eq!(report.pending, vec!["1_a.sql", "2_b.sql"]);
        assert!(!ledger::table_exists(&conn, &config.ledger_table).unwrap());
    }

    #[test]
    fn test_status_reports_drift_and_missing() {
        let conn = Connection::open_in_memory().unwrap();
        let config = MigratorConfig::default();
        let table = config.ledger_table.as_str();
        ledger::ensure_schema(&conn, table).unwrap();
        ledger::record(&conn, table, "1_a.sql", "1_a", Some(&compute_checksum("SELECT 1;")))
            .unwrap();
        ledger::record(&conn, table, "2_b.sql", "2_b", Some(&compute_checksum("SELECT 2;")))
            .unwrap();
        ledger::record(&conn, table, "3_c.sql", "3_c", None).unwrap();
        ledger::record(&conn, table, "4_gone.sql", "4_gone", None).unwrap();

        let source = MemorySource::new()
            .with_file("1_a.sql", "SELECT 1;")
            .with_file("2_b.sql", "SELECT 2; -- edited")
            .with_file("3_c.sql", "anything")
            .with_file("5_new.sql", "SELECT 5;");

        let report = migration_status(&conn, &source, &config).unwrap();

        assert_eq!(report.executed.len(), 4);
        assert_eq!(report.drifted, vec!["2_b.sql"]);
        assert_eq!(report.missing, vec!["4_gone.sql"]);
        assert_eq!(report.pending, vec!["5_new.sql"]);
    }
}
