//! Migration file scaffolding
//!
//! Plain file I/O: nothing here touches the database.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, MigrateError, Result};
use chrono::{DateTime, Utc};
use migrax_core::config::MigratorConfig;
use migrax_core::naming::{is_rollback_file, rollback_filename, scaffold_filename, slugify};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Files written by [`create_migration`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedMigration {
    pub up: PathBuf,
    pub down: Option<PathBuf>,
}

/// Create an empty migration named `<unixMillis>_<slug>.<ext>` in `dir`,
/// and its down script when `with_rollback` is set.
///
/// Never overwrites: if either target exists, nothing is written. Names
/// whose slug ends in the rollback suffix are rejected, since discovery
/// would read the file as a down script and never apply it.
pub fn create_migration(
    dir: &Path,
    name: &str,
    with_rollback: bool,
    config: &MigratorConfig,
) -> Result<ScaffoldedMigration> {
    create_migration_at(dir, name, with_rollback, config, Utc::now())
}

/// [`create_migration`] with an explicit creation time
pub fn create_migration_at(
    dir: &Path,
    name: &str,
    with_rollback: bool,
    config: &MigratorConfig,
    now: DateTime<Utc>,
) -> Result<ScaffoldedMigration> {
    let slug = slugify(name)?;
    let up_name = scaffold_filename(now.timestamp_millis(), &slug, config);
    if is_rollback_file(&up_name, config) {
        return Err(MigrateError::InvalidName {
            reason: format!(
                "'{}' ends with '{}' and would be read as a down script",
                slug, config.rollback_suffix
            ),
        });
    }
    let up = dir.join(&up_name);
    let down = with_rollback.then(|| dir.join(rollback_filename(&up_name, config)));

    for path in std::iter::once(&up).chain(down.as_ref()) {
        if path.exists() {
            return Err(already_exists(path));
        }
    }

    fs::create_dir_all(dir).map_err(|e| io_error("create_migrations_dir", e))?;

    let created = now.to_rfc3339();
    write_new(&up, &format!("-- Migration: {slug}\n-- Created: {created}\n\n"))?;
    if let Some(down) = &down {
        write_new(
            down,
            &format!("-- Rollback: {slug}\n-- Created: {created}\n\n"),
        )?;
    }

    Ok(ScaffoldedMigration { up, down })
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                already_exists(path)
            } else {
                io_error("create_migration", e)
            }
        })?;
    file.write_all(content.as_bytes())
        .map_err(|e| io_error("create_migration", e))
}

fn already_exists(path: &Path) -> MigrateError {
    MigrateError::AlreadyExists {
        path: path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    #[test]
    fn test_creates_up_and_down() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("migrations");
        let config = MigratorConfig::default();

        let created =
            create_migration_at(&dir, "Add Users", true, &config, fixed_time()).unwrap();

        assert_eq!(created.up, dir.join("1700000000123_add_users.sql"));
        assert_eq!(
            created.down,
            Some(dir.join("1700000000123_add_users_rollback.sql"))
        );
        let text = fs::read_to_string(&created.up).unwrap();
        assert!(text.starts_with("-- Migration: add_users"));
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let config = MigratorConfig::default();
        create_migration_at(tmp.path(), "init", false, &config, fixed_time()).unwrap();

        let err =
            create_migration_at(tmp.path(), "init", true, &config, fixed_time()).unwrap_err();
        assert!(matches!(err, MigrateError::AlreadyExists { .. }));
        // The down script was not written either
        assert!(!tmp
            .path()
            .join("1700000000123_init_rollback.sql")
            .exists());
    }

    #[test]
    fn test_rejects_unusable_name() {
        let tmp = TempDir::new().unwrap();
        let err = create_migration(tmp.path(), "!!!", false, &MigratorConfig::default())
            .unwrap_err();
        assert!(matches!(err, MigrateError::InvalidName { .. }));
    }

    #[test]
    fn test_rejects_name_ending_in_rollback_suffix() {
        let tmp = TempDir::new().unwrap();
        let config = MigratorConfig::default();

        let err = create_migration_at(tmp.path(), "fix rollback", false, &config, fixed_time())
            .unwrap_err();
        assert!(matches!(err, MigrateError::InvalidName { .. }));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);

        // The suffix only matters at the end of the slug
        let created =
            create_migration_at(tmp.path(), "rollback fix", false, &config, fixed_time()).unwrap();
        assert_eq!(created.up, tmp.path().join("1700000000123_rollback_fix.sql"));
    }
}
