//! Migration sources
//!
//! A source answers three questions: which entries exist, what a given
//! entry contains, and whether an entry exists. The engine never touches
//! the filesystem directly, so tests can run against [`MemorySource`].

mod fs;
mod memory;

pub use fs::FsSource;
pub use memory::MemorySource;

use crate::errors::Result;

/// Read access to a collection of migration scripts
pub trait MigrationSource {
    /// All entry names in the source, in no particular order.
    ///
    /// A source that does not exist yet is empty, not an error.
    fn list_entries(&self) -> Result<Vec<String>>;

    /// Full UTF-8 text of `name`
    fn read(&self, name: &str) -> Result<String>;

    /// Whether `name` is present
    fn exists(&self, name: &str) -> bool;

    /// Human-readable location, used in error messages
    fn describe(&self) -> String;
}
