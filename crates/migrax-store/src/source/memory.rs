use super::MigrationSource;
use crate::errors::{MigrateError, Result};
use std::collections::BTreeMap;

/// In-memory migration source for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_file(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.insert(name, sql);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, sql: impl Into<String>) {
        self.files.insert(name.into(), sql.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.files.remove(name)
    }
}

impl MigrationSource for MemorySource {
    fn list_entries(&self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<String> {
        self.files.get(name).cloned().ok_or_else(|| MigrateError::Io {
            op: "read_migration".to_string(),
            message: format!("{}: not found in memory source", name),
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
