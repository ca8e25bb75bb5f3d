//! Apply pending migrations
//!
//! Usage: migrax up [--dry-run]

use clap::Args;
use migrax_core::config::MigratorConfig;
use migrax_store::db::with_connection;
use migrax_store::{migrate_up, FsSource};

#[derive(Debug, Args)]
pub struct UpArgs {
    /// Show what would be applied without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: UpArgs, config: &MigratorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = FsSource::new(&config.migrations_dir);
    let report = with_connection(&config.database, |conn| {
        migrate_up(conn, &source, config, args.dry_run)
    })?;

    if report.dry_run {
        if report.pending.is_empty() {
            println!("Nothing to migrate ({} already applied)", report.skipped_count);
        }
        for pending in &report.pending {
            println!(
                "Would apply {} ({} statements)",
                pending.filename, pending.statement_count
            );
        }
        return Ok(());
    }

    if report.applied.is_empty() {
        println!("Nothing to migrate ({} already applied)", report.skipped_count);
        return Ok(());
    }
    for applied in &report.applied {
        println!(
            "✓ Applied {} ({} statements, {} ms)",
            applied.filename, applied.statement_count, applied.duration_ms
        );
    }
    println!("Applied {} migration(s)", report.applied.len());

    Ok(())
}
