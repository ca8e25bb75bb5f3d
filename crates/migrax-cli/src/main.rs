//! migrax CLI
//!
//! Command-line interface for the migrax migration engine

use clap::{Parser, Subcommand};
use migrax_core::errors::{ExError, MigrateError};
use migrax_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "migrax")]
#[command(about = "migrax - Versioned SQL migrations for SQLite", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Up(commands::up::UpArgs),
    /// Roll back the most recently applied migration
    Down(commands::down::DownArgs),
    /// Show executed and pending migrations
    Status(commands::status::StatusArgs),
    /// Create a new empty migration file
    Create(commands::create::CreateArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.global.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = commands::resolve_config(&cli.global).and_then(|config| match cli.command {
        Commands::Up(args) => commands::up::execute(args, &config),
        Commands::Down(args) => commands::down::execute(args, &config),
        Commands::Status(args) => commands::status::execute(args, &config),
        Commands::Create(args) => commands::create::execute(args, &config),
    });

    if let Err(e) = result {
        match e.downcast_ref::<MigrateError>() {
            Some(err) => {
                let ex_err: ExError = err.clone().into();
                eprintln!("Error [{}]: {}", ex_err.code(), err);
            }
            None => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}
