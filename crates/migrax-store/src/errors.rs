//! Error handling for migrax-store
//!
//! Maps rusqlite and std::io failures into the core MigrateError taxonomy

pub use migrax_core::errors::{MigrateError, Result};

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> MigrateError {
    MigrateError::Persistence {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// Create an IO error
pub fn io_error(op: &str, err: std::io::Error) -> MigrateError {
    MigrateError::Io {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// Whether a rusqlite error is a UNIQUE/PRIMARY KEY constraint violation
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}
