//! migrax Store - SQLite-backed migration engine
//!
//! Provides:
//! - Connection management with scoped acquisition
//! - Migration sources (filesystem directory, in-memory)
//! - The ledger table recording applied migrations
//! - Discovery, the transactional applier, the runner and rollback
//! - Read-only status with drift detection, and file scaffolding

pub mod applier;
pub mod db;
pub mod discovery;
pub mod errors;
pub mod ledger;
pub mod rollback;
pub mod runner;
pub mod scaffold;
pub mod source;
pub mod status;

// Re-export key types
pub use applier::apply_migration;
pub use errors::Result;
pub use rollback::rollback_last;
pub use runner::migrate_up;
pub use scaffold::{create_migration, ScaffoldedMigration};
pub use source::{FsSource, MemorySource, MigrationSource};
pub use status::migration_status;
