//! Configuration types and parsing for migrax.toml

use crate::errors::{MigrateError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "migrax.toml";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigratorConfig {
    /// SQLite database file the migrations are applied to
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Directory holding the migration scripts
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,

    /// Name of the ledger table
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// Recognized migration file extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Suffix inserted before the extension to name a down script
    #[serde(default = "default_rollback_suffix")]
    pub rollback_suffix: String,
}

fn default_database() -> PathBuf {
    PathBuf::from("migrax.db")
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_ledger_table() -> String {
    "migrations".to_string()
}

fn default_extension() -> String {
    "sql".to_string()
}

fn default_rollback_suffix() -> String {
    "_rollback".to_string()
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            migrations_dir: default_migrations_dir(),
            ledger_table: default_ledger_table(),
            extension: default_extension(),
            rollback_suffix: default_rollback_suffix(),
        }
    }
}

impl MigratorConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MigrateError::Io {
            op: "load_config".to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    /// Load configuration from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MigratorConfig =
            toml::from_str(content).map_err(|e| MigrateError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    ///
    /// The ledger table name is interpolated into SQL, so it must be a
    /// plain identifier.
    pub fn validate(&self) -> Result<()> {
        if !is_plain_identifier(&self.ledger_table) {
            return Err(MigrateError::InvalidConfig {
                reason: format!(
                    "ledger_table '{}' must be a non-empty identifier of ASCII letters, digits and underscores",
                    self.ledger_table
                ),
            });
        }
        if self.extension.is_empty() || self.extension.contains('.') {
            return Err(MigrateError::InvalidConfig {
                reason: format!(
                    "extension '{}' must be non-empty and given without a dot",
                    self.extension
                ),
            });
        }
        if self.rollback_suffix.is_empty() {
            return Err(MigrateError::InvalidConfig {
                reason: "rollback_suffix must not be empty".to_string(),
            });
        }
        if self.migrations_dir.as_os_str().is_empty() {
            return Err(MigrateError::InvalidConfig {
                reason: "migrations_dir must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
