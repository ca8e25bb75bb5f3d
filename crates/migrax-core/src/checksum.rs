//! Checksums of migration text
//!
//! Stored in the ledger at apply time so later edits to an applied file
//! can be reported as drift.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 checksum of a migration's text, hex encoded
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
