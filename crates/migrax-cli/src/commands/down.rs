//! Roll back the most recent migration
//!
//! Usage: migrax down

use clap::Args;
use migrax_core::config::MigratorConfig;
use migrax_core::model::RollbackResult;
use migrax_store::db::with_connection;
use migrax_store::{rollback_last, FsSource};

#[derive(Debug, Args)]
pub struct DownArgs {}

pub fn execute(
    _args: DownArgs,
    config: &MigratorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = FsSource::new(&config.migrations_dir);
    let result = with_connection(&config.database, |conn| {
        rollback_last(conn, &source, config)
    })?;

    match result {
        RollbackResult::NothingToRollback => println!("Nothing to roll back"),
        RollbackResult::RolledBack {
            entry,
            down_script: Some(script),
        } => println!("✓ Rolled back {} (ran {})", entry.filename, script),
        RollbackResult::RolledBack {
            entry,
            down_script: None,
        } => println!(
            "✓ Removed {} from the ledger (no down script; schema not reverted)",
            entry.filename
        ),
    }

    Ok(())
}
