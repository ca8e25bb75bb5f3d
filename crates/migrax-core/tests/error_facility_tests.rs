use migrax_core::errors::{ExError, ExErrorKind, MigrateError};

#[test]
fn test_statement_execution_keeps_location() {
    let err = MigrateError::StatementExecution {
        filename: "1700000000000_add_users.sql".to_string(),
        statement_index: 2,
        statement_text: "ALTER TABLE users ADD COLUMN email TEXT".to_string(),
        cause: "no such table: users".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::StatementExecution);
    assert_eq!(ex_err.code(), "ERR_STATEMENT_EXECUTION");
    assert_eq!(ex_err.filename(), Some("1700000000000_add_users.sql"));
    assert_eq!(ex_err.statement_index(), Some(2));
    assert_eq!(ex_err.message(), "no such table: users");
}

#[test]
fn test_duplicate_entry_distinct_from_persistence() {
    let err = MigrateError::DuplicateLedgerEntry {
        filename: "1_init.sql".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateLedgerEntry);
    assert_ne!(ex_err.kind(), ExErrorKind::Persistence);
    assert_eq!(ex_err.filename(), Some("1_init.sql"));
}

#[test]
fn test_io_error_keeps_operation() {
    let err = MigrateError::Io {
        op: "read_migration".to_string(),
        message: "permission denied".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Io);
    assert_eq!(ex_err.op(), Some("read_migration"));
    assert_eq!(ex_err.message(), "permission denied");
}

#[test]
fn test_rolled_back_classification() {
    let statement = MigrateError::StatementExecution {
        filename: "a.sql".to_string(),
        statement_index: 0,
        statement_text: "x".to_string(),
        cause: "y".to_string(),
    };
    let discovery = MigrateError::Discovery {
        dir: "migrations".to_string(),
        reason: "permission denied".to_string(),
    };

    assert!(statement.is_rolled_back());
    assert!(!discovery.is_rolled_back());
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::Discovery, "ERR_DISCOVERY"),
        (ExErrorKind::LedgerUnavailable, "ERR_LEDGER_UNAVAILABLE"),
        (ExErrorKind::StatementExecution, "ERR_STATEMENT_EXECUTION"),
        (ExErrorKind::DuplicateLedgerEntry, "ERR_DUPLICATE_LEDGER_ENTRY"),
        (ExErrorKind::RollbackExecution, "ERR_ROLLBACK_EXECUTION"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
