//! migrax Core - pure kernel of the migration engine
//!
//! This crate holds everything that needs no database and no filesystem
//! beyond reading a config file:
//! - Statement tokenizer for raw migration SQL
//! - Data model shared by the engine and its callers
//! - File naming conventions (up scripts, down scripts, scaffolding)
//! - Configuration, checksums, error taxonomy and the logging facility

pub mod checksum;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod naming;
pub mod tokenizer;

// Re-export commonly used types
pub use config::MigratorConfig;
pub use errors::{ExError, ExErrorKind, MigrateError, Result};
pub use model::{
    AppliedMigration, ApplyResult, LedgerEntry, MigrationFile, PendingMigration, RollbackResult,
    Statement, StatusReport, UpReport,
};
pub use tokenizer::tokenize;
