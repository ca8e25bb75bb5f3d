use super::MigrationSource;
use crate::errors::{io_error, MigrateError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Migration scripts stored as files in one flat directory
#[derive(Debug, Clone)]
pub struct FsSource {
    dir: PathBuf,
}

impl FsSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory (and parents) if it does not exist
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error("create_migrations_dir", e))
    }

    fn discovery_error(&self, err: std::io::Error) -> MigrateError {
        MigrateError::Discovery {
            dir: self.describe(),
            reason: err.to_string(),
        }
    }
}

impl MigrationSource for FsSource {
    fn list_entries(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // A fresh project has no migrations yet
                self.ensure_dir()?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.discovery_error(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.discovery_error(e))?;
            let file_type = entry.file_type().map_err(|e| self.discovery_error(e))?;
            if file_type.is_dir() {
                continue;
            }
            // Non-UTF-8 names cannot follow the naming convention
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| MigrateError::Io {
            op: "read_migration".to_string(),
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.dir.join(name).is_file()
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
