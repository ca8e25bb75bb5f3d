//! Migration engine data model
//!
//! Plain values passed between discovery, the ledger, the applier and the
//! presentation layer. None of these hold a connection.

use chrono::{DateTime, Utc};
use migrax_core_types::RunId;
use serde::{Deserialize, Serialize};

use crate::errors::MigrateError;

/// One versioned change script as read from its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Exact filename; lexicographic order is apply order
    pub filename: String,
    /// Full UTF-8 text of the script
    pub raw_sql: String,
}

impl MigrationFile {
    pub fn new(filename: impl Into<String>, raw_sql: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            raw_sql: raw_sql.into(),
        }
    }
}

/// One row of the ledger table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Insertion order; reconstructs apply history
    pub id: i64,
    /// Filename with the extension stripped
    pub name: String,
    /// Exact filename, join key against [`MigrationFile`]
    pub filename: String,
    /// When the migration's transaction committed
    pub executed_at: DateTime<Utc>,
    /// SHA-256 of the script text at apply time (absent on rows written
    /// by tools that do not record it)
    pub checksum: Option<String>,
}

/// One executable SQL statement produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Zero-based position within its migration file
    pub index: usize,
    /// 1-based line of the file on which the statement text starts
    pub line: usize,
    /// Trimmed statement text, without the terminating `;`
    pub text: String,
}

/// Outcome of applying one migration file
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyResult {
    /// All statements ran and the ledger entry was written in the same
    /// transaction
    Committed {
        entry: LedgerEntry,
        statement_count: usize,
    },
    /// A statement failed and the transaction was rolled back.
    /// `error` is always [`MigrateError::StatementExecution`].
    Failed {
        statement_index: usize,
        error: MigrateError,
    },
}

impl ApplyResult {
    pub fn is_committed(&self) -> bool {
        matches!(self, ApplyResult::Committed { .. })
    }

    /// Convert into the batch-level result, surfacing a failure as an error
    pub fn into_result(self) -> Result<(LedgerEntry, usize), MigrateError> {
        match self {
            ApplyResult::Committed {
                entry,
                statement_count,
            } => Ok((entry, statement_count)),
            ApplyResult::Failed { error, .. } => Err(error),
        }
    }
}

/// Summary of one committed migration within an `up` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub filename: String,
    pub statement_count: usize,
    pub ledger_id: i64,
    pub duration_ms: u64,
}

/// A pending migration as seen by a dry run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMigration {
    pub filename: String,
    pub statement_count: usize,
}

/// Result of an `up` run
#[derive(Debug, Clone, Serialize)]
pub struct UpReport {
    pub run_id: RunId,
    /// Committed migrations, in apply order (empty on a dry run)
    pub applied: Vec<AppliedMigration>,
    /// Pending migrations found by a dry run (empty otherwise)
    pub pending: Vec<PendingMigration>,
    /// Number of migrations already in the ledger before this run
    pub skipped_count: usize,
    pub dry_run: bool,
    pub duration_ms: u64,
}

/// Result of a `down` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RollbackResult {
    /// The ledger was empty
    NothingToRollback,
    /// The most recent entry was removed
    RolledBack {
        entry: LedgerEntry,
        /// Down script that was executed, or `None` when no script exists
        /// and only the ledger entry was removed
        down_script: Option<String>,
    },
}

/// Read-only view of ledger versus source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Ledger entries in apply order
    pub executed: Vec<LedgerEntry>,
    /// Filenames not yet applied, in apply order
    pub pending: Vec<String>,
    /// Executed filenames whose current text no longer matches the
    /// recorded checksum
    pub drifted: Vec<String>,
    /// Executed filenames that are no longer present in the source
    pub missing: Vec<String>,
}
