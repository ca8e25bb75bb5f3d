//! Show migration status
//!
//! Usage: migrax status [--json]

use clap::Args;
use migrax_core::config::MigratorConfig;
use migrax_store::db::with_connection;
use migrax_store::{migration_status, FsSource};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(
    args: StatusArgs,
    config: &MigratorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = FsSource::new(&config.migrations_dir);
    let report = with_connection(&config.database, |conn| {
        migration_status(conn, &source, config)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Executed: {}", report.executed.len());
    for entry in &report.executed {
        println!(
            "  {}  {}",
            entry.executed_at.format("%Y-%m-%d %H:%M:%S"),
            entry.filename
        );
    }
    println!("Pending: {}", report.pending.len());
    for filename in &report.pending {
        println!("  {}", filename);
    }
    for filename in &report.drifted {
        println!("warning: {} changed since it was applied", filename);
    }
    for filename in &report.missing {
        println!("warning: {} is recorded but no longer on disk", filename);
    }

    Ok(())
}
