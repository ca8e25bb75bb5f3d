//! Scaffold a migration file
//!
//! Usage: migrax create <NAME> [--with-rollback]

use clap::Args;
use migrax_core::config::MigratorConfig;
use migrax_store::create_migration;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Human-readable migration name, e.g. "add users table"
    pub name: String,

    /// Also create the paired rollback script
    #[arg(long)]
    pub with_rollback: bool,
}

pub fn execute(
    args: CreateArgs,
    config: &MigratorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let created = create_migration(
        &config.migrations_dir,
        &args.name,
        args.with_rollback,
        config,
    )?;

    println!("Created {}", created.up.display());
    if let Some(down) = created.down {
        println!("Created {}", down.display());
    }

    Ok(())
}
