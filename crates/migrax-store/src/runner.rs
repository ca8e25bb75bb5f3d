//! Migration runner
//!
//! Discovers pending migrations and applies them in order, halting at
//! the first failure.

#![allow(clippy::result_large_err)]

use crate::applier::apply_migration;
use crate::discovery::{list_migration_files, pending_filenames};
use crate::errors::Result;
use crate::ledger;
use crate::source::MigrationSource;
use migrax_core::config::MigratorConfig;
use migrax_core::model::{AppliedMigration, ApplyResult, MigrationFile, PendingMigration, UpReport};
use migrax_core::tokenizer::tokenize;
use migrax_core::{log_op_end, log_op_error, log_op_start};
use migrax_core_types::RunId;
use rusqlite::Connection;
use std::time::Instant;

/// Apply all pending migrations from `source`.
///
/// Each file commits independently. On the first failure the run stops
/// and the error is returned; files committed before it stay committed
/// and files after it are not attempted.
///
/// With `dry_run`, pending files are read and tokenized but nothing is
/// executed and the ledger table is not created.
pub fn migrate_up(
    conn: &mut Connection,
    source: &dyn MigrationSource,
    config: &MigratorConfig,
    dry_run: bool,
) -> Result<UpReport> {
    let start = Instant::now();
    let run_id = RunId::new();
    log_op_start!("migrate_up", run_id = run_id.as_str(), dry_run = dry_run);

    let result = run(conn, source, config, dry_run, &run_id, start);
    match &result {
        Ok(report) => {
            log_op_end!(
                "migrate_up",
                duration_ms = report.duration_ms,
                run_id = run_id.as_str(),
                applied_len = report.applied.len(),
                pending_len = report.pending.len(),
                skipped_count = report.skipped_count
            );
        }
        Err(e) => {
            log_op_error!(
                "migrate_up",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = run_id.as_str()
            );
        }
    }
    result
}

fn run(
    conn: &mut Connection,
    source: &dyn MigrationSource,
    config: &MigratorConfig,
    dry_run: bool,
    run_id: &RunId,
    start: Instant,
) -> Result<UpReport> {
    // Discovery first: an unreadable directory leaves the database untouched
    let all = list_migration_files(source, config)?;
    if !dry_run {
        ledger::ensure_schema(conn, &config.ledger_table)?;
    }

    let executed = ledger::list_executed_filenames(conn, &config.ledger_table)?;
    let total = all.len();
    let pending = pending_filenames(all, &executed);
    let skipped_count = total - pending.len();

    let mut report = UpReport {
        run_id: run_id.clone(),
        applied: Vec::new(),
        pending: Vec::new(),
        skipped_count,
        dry_run,
        duration_ms: 0,
    };

    for filename in pending {
        let file = MigrationFile::new(filename.as_str(), source.read(&filename)?);

        if dry_run {
            report.pending.push(PendingMigration {
                statement_count: tokenize(&file.raw_sql).len(),
                filename,
            });
            continue;
        }

        let file_start = Instant::now();
        match apply_migration(conn, &file, config)? {
            ApplyResult::Committed {
                entry,
                statement_count,
            } => report.applied.push(AppliedMigration {
                filename,
                statement_count,
                ledger_id: entry.id,
                duration_ms: file_start.elapsed().as_millis() as u64,
            }),
            ApplyResult::Failed { error, .. } => return Err(error),
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    Ok(report)
}
