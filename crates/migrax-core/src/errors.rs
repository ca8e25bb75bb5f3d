use thiserror::Error;

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Maximum number of characters of a statement shown in error messages
pub const STATEMENT_DISPLAY_CHARS: usize = 160;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, log assertions, and process exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidConfig,
    InvalidName,
    AlreadyExists,

    // Engine
    Discovery,
    LedgerUnavailable,
    StatementExecution,
    DuplicateLedgerEntry,
    RollbackExecution,

    // Integration/IO
    Io,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Discovery => "ERR_DISCOVERY",
            ExErrorKind::LedgerUnavailable => "ERR_LEDGER_UNAVAILABLE",
            ExErrorKind::StatementExecution => "ERR_STATEMENT_EXECUTION",
            ExErrorKind::DuplicateLedgerEntry => "ERR_DUPLICATE_LEDGER_ENTRY",
            ExErrorKind::RollbackExecution => "ERR_ROLLBACK_EXECUTION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Flattened view of a [`MigrateError`] with classification fields for
/// programmatic handling. The logging macros and the CLI speak this type.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    filename: Option<String>,
    statement_index: Option<usize>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            filename: None,
            statement_index: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration filename context
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Add statement index context
    pub fn with_statement_index(mut self, index: usize) -> Self {
        self.statement_index = Some(index);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the filename context, if any
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get the statement index context, if any
    pub fn statement_index(&self) -> Option<usize> {
        self.statement_index
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(filename) = &self.filename {
            write!(f, " (filename: {})", filename)?;
        }
        if let Some(index) = self.statement_index {
            write!(f, " (statement_index: {})", index)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for migration engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    /// Migration directory exists but cannot be listed
    #[error("Cannot read migration directory {dir}: {reason}")]
    Discovery { dir: String, reason: String },

    /// Ledger table is missing and could not be created
    #[error("Migration ledger unavailable: {reason}")]
    LedgerUnavailable { reason: String },

    /// A statement failed; its migration was rolled back
    #[error(
        "Migration {filename} failed at statement {statement_index}: {cause}\n  statement: {}",
        truncate_for_display(.statement_text, STATEMENT_DISPLAY_CHARS)
    )]
    StatementExecution {
        filename: String,
        statement_index: usize,
        statement_text: String,
        cause: String,
    },

    /// Filename already recorded in the ledger
    #[error("Migration {filename} is already recorded in the ledger")]
    DuplicateLedgerEntry { filename: String },

    /// Down script failed; the ledger entry was kept
    #[error("Rollback script {filename} failed: {cause}")]
    RollbackExecution { filename: String, cause: String },

    /// Configuration value rejected
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Migration name cannot be turned into a filename
    #[error("Invalid migration name: {reason}")]
    InvalidName { reason: String },

    /// Scaffolding target already exists
    #[error("Migration file already exists: {path}")]
    AlreadyExists { path: String },

    /// Filesystem error
    #[error("IO error during {op}: {message}")]
    Io { op: String, message: String },

    /// Database error outside of statement execution
    #[error("Database error during {op}: {message}")]
    Persistence { op: String, message: String },
}

impl MigrateError {
    /// Whether this error left a migration rolled back (as opposed to an
    /// infrastructure failure before any transaction opened)
    pub fn is_rolled_back(&self) -> bool {
        matches!(
            self,
            MigrateError::StatementExecution { .. } | MigrateError::RollbackExecution { .. }
        )
    }
}

/// Conversion from MigrateError to ExError
impl From<MigrateError> for ExError {
    fn from(err: MigrateError) -> Self {
        let message = err.to_string();
        match err {
            MigrateError::Discovery { .. } => ExError::new(ExErrorKind::Discovery)
                .with_op("discover")
                .with_message(message),

            MigrateError::LedgerUnavailable { .. } => {
                ExError::new(ExErrorKind::LedgerUnavailable)
                    .with_op("ensure_schema")
                    .with_message(message)
            }

            MigrateError::StatementExecution {
                filename,
                statement_index,
                cause,
                ..
            } => ExError::new(ExErrorKind::StatementExecution)
                .with_op("apply")
                .with_filename(filename)
                .with_statement_index(statement_index)
                .with_message(cause),

            MigrateError::DuplicateLedgerEntry { filename } => {
                ExError::new(ExErrorKind::DuplicateLedgerEntry)
                    .with_op("record")
                    .with_filename(filename)
                    .with_message(message)
            }

            MigrateError::RollbackExecution { filename, cause } => {
                ExError::new(ExErrorKind::RollbackExecution)
                    .with_op("rollback")
                    .with_filename(filename)
                    .with_message(cause)
            }

            MigrateError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            MigrateError::InvalidName { .. } => ExError::new(ExErrorKind::InvalidName)
                .with_op("create")
                .with_message(message),

            MigrateError::AlreadyExists { .. } => ExError::new(ExErrorKind::AlreadyExists)
                .with_op("create")
                .with_message(message),

            MigrateError::Io { op, message } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),

            MigrateError::Persistence { op, message } => ExError::new(ExErrorKind::Persistence)
                .with_op(op)
                .with_message(message),
        }
    }
}

/// Shorten `text` to at most `max_chars` characters for display.
///
/// Whitespace runs (including newlines) collapse to a single space so a
/// multi-line statement fits on one log line. Never used for execution.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut shortened: String = collapsed.chars().take(max_chars).collect();
    shortened.push_str("...");
    shortened
}
