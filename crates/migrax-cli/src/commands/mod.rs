//! Subcommands and the options they share

pub mod create;
pub mod down;
pub mod status;
pub mod up;

use clap::Args;
use migrax_core::config::{MigratorConfig, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};

/// Options accepted by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to ./migrax.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = "MIGRAX_DATABASE")]
    pub db: Option<PathBuf>,

    /// Migrations directory
    #[arg(long, global = true, env = "MIGRAX_DIR")]
    pub dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Build the effective configuration: file values, then flag overrides.
///
/// An explicit `--config` must exist; the default file is optional.
pub fn resolve_config(args: &GlobalArgs) -> Result<MigratorConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => MigratorConfig::load(path)?,
        None => MigratorConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    if let Some(db) = &args.db {
        config.database = db.clone();
    }
    if let Some(dir) = &args.dir {
        config.migrations_dir = dir.clone();
    }
    config.validate()?;

    Ok(config)
}
