//! Migration file naming conventions
//!
//! Up scripts are `<unixMillis>_<slug>.<ext>`; the paired down script
//! inserts the rollback suffix before the extension, e.g.
//! `1700000000000_add_users_rollback.sql`.

use crate::config::MigratorConfig;
use crate::errors::{MigrateError, Result};

/// Strip `.<extension>` from a filename, if present
pub fn strip_extension<'a>(filename: &'a str, extension: &str) -> &'a str {
    filename
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(filename)
}

/// Ledger name for a migration file (filename without extension)
pub fn migration_name(filename: &str, config: &MigratorConfig) -> String {
    strip_extension(filename, &config.extension).to_string()
}

/// Whether `filename` is a down script under the configured convention
pub fn is_rollback_file(filename: &str, config: &MigratorConfig) -> bool {
    has_extension(filename, &config.extension)
        && strip_extension(filename, &config.extension).ends_with(&config.rollback_suffix)
}

/// Whether `filename` belongs to the apply set: the recognized extension,
/// and not a down script
pub fn is_migration_file(filename: &str, config: &MigratorConfig) -> bool {
    has_extension(filename, &config.extension) && !is_rollback_file(filename, config)
}

/// Down script filename paired with an up script
pub fn rollback_filename(filename: &str, config: &MigratorConfig) -> String {
    format!(
        "{}{}.{}",
        strip_extension(filename, &config.extension),
        config.rollback_suffix,
        config.extension
    )
}

/// Turn a free-form migration name into a filename slug.
///
/// Lowercases ASCII letters, keeps digits, and collapses every other run
/// of characters into a single `_`.
pub fn slugify(name: &str) -> Result<String> {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        return Err(MigrateError::InvalidName {
            reason: format!(
                "'{}' contains no ASCII letters or digits to build a filename from",
                name
            ),
        });
    }
    Ok(slug)
}

/// Filename for a new migration created at `unix_millis`
pub fn scaffold_filename(unix_millis: i64, slug: &str, config: &MigratorConfig) -> String {
    format!("{}_{}.{}", unix_millis, slug, config.extension)
}

fn has_extension(filename: &str, extension: &str) -> bool {
    strip_extension(filename, extension).len() < filename.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MigratorConfig {
        MigratorConfig::default()
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("1_init.sql", "sql"), "1_init");
        assert_eq!(strip_extension("1_init.txt", "sql"), "1_init.txt");
        // "sql" without a dot is not an extension
        assert_eq!(strip_extension("1_initsql", "sql"), "1_initsql");
    }

    #[test]
    fn test_migration_name() {
        assert_eq!(
            migration_name("1700000000000_create_users.sql", &config()),
            "1700000000000_create_users"
        );
    }

    #[test]
    fn test_rollback_filename() {
        assert_eq!(
            rollback_filename("1700000000000_create_users.sql", &config()),
            "1700000000000_create_users_rollback.sql"
        );
    }

    #[test]
    fn test_migration_file_filter() {
        let config = config();
        assert!(is_migration_file("1_init.sql", &config));
        assert!(!is_migration_file("1_init_rollback.sql", &config));
        assert!(!is_migration_file("README.md", &config));
        assert!(!is_migration_file("1_init.sql.bak", &config));
        assert!(is_rollback_file("1_init_rollback.sql", &config));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Create Users").unwrap(), "create_users");
        assert_eq!(slugify("  add--index on (email) ").unwrap(), "add_index_on_email");
        assert_eq!(slugify("v2").unwrap(), "v2");
    }

    #[test]
    fn test_slugify_rejects_empty() {
        assert!(matches!(
            slugify("!!!"),
            Err(MigrateError::InvalidName { .. })
        ));
        assert!(slugify("").is_err());
    }

    #[test]
    fn test_scaffold_filename() {
        assert_eq!(
            scaffold_filename(1700000000000, "create_users", &config()),
            "1700000000000_create_users.sql"
        );
    }
}
