//! Structured logging for migrax
//!
//! The engine never prints. It emits `start`/`end`/`end_error` events
//! through the `log_op_*` macros and returns reports; the binary picks
//! the output format with [`init`]. Tests read events back through
//! [`test_capture`].

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
