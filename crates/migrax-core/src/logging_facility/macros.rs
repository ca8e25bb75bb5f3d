//! Operation boundary macros
//!
//! Each emits one event tagged with `component` (the calling module),
//! `op` and `event`, followed by any extra `key = value` fields. Callers
//! depend on `migrax-core-types` for the event names.

/// `start` event for an operation
///
/// ```
/// # use migrax_core::log_op_start;
/// log_op_start!("apply");
/// log_op_start!("apply", filename = "1700000000000_init.sql");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = migrax_core_types::schema::EVENT_START,
            $($($field)+)?
        );
    }};
}

/// `end` event for an operation that succeeded
///
/// ```
/// # use migrax_core::log_op_end;
/// log_op_end!("apply", duration_ms = 42, statement_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = migrax_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        );
    }};
}

/// `end_error` event carrying `err.kind`, `err.code` and `err.message`.
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError),
/// a `MigrateError` included.
///
/// ```
/// # use migrax_core::{log_op_error, errors::MigrateError};
/// let err = MigrateError::LedgerUnavailable { reason: "disk full".to_string() };
/// log_op_error!("ensure_schema", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err = $crate::errors::ExError::from($err);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = migrax_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            $($($field)+)?
        );
    }};
}
