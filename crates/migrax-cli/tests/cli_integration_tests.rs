//! CLI integration tests
//!
//! Run the built `migrax` binary against temporary project directories.

use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn migrax(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_migrax"))
        .current_dir(project)
        .env_remove("MIGRAX_DATABASE")
        .env_remove("MIGRAX_DIR")
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_migration(project: &Path, name: &str, sql: &str) {
    let dir = project.join("migrations");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), sql).unwrap();
}

fn ledger_filenames(db: &Path) -> Vec<String> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn
        .prepare("SELECT filename FROM migrations ORDER BY id")
        .unwrap();
    let rows = stmt.query_map([], |row| row.get(0)).unwrap();
    rows.collect::<Result<Vec<String>, _>>().unwrap()
}

#[test]
fn test_up_applies_and_second_up_is_noop() {
    let tmp = TempDir::new().unwrap();
    write_migration(tmp.path(), "1_users.sql", "CREATE TABLE users (id INTEGER);");
    write_migration(
        tmp.path(),
        "2_posts.sql",
        "CREATE TABLE posts (id INTEGER); CREATE INDEX posts_id ON posts (id);",
    );

    let output = migrax(tmp.path(), &["up"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("Applied 1_users.sql (1 statements"));
    assert!(out.contains("Applied 2_posts.sql (2 statements"));
    assert_eq!(
        ledger_filenames(&tmp.path().join("migrax.db")),
        vec!["1_users.sql", "2_posts.sql"]
    );

    let output = migrax(tmp.path(), &["up"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Nothing to migrate (2 already applied)"));
}

#[test]
fn test_up_failure_exits_nonzero_with_location() {
    let tmp = TempDir::new().unwrap();
    write_migration(tmp.path(), "1_ok.sql", "CREATE TABLE ok (id INTEGER);");
    write_migration(tmp.path(), "2_bad.sql", "SELECT 1;\nINSERT INTO nowhere VALUES (1);");

    let output = migrax(tmp.path(), &["up"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error [ERR_STATEMENT_EXECUTION]"));
    assert!(stderr.contains("Migration 2_bad.sql failed at statement 1"));
    assert!(stderr.contains("INSERT INTO nowhere"));
    assert_eq!(
        ledger_filenames(&tmp.path().join("migrax.db")),
        vec!["1_ok.sql"]
    );
}

#[test]
fn test_dry_run_lists_without_applying() {
    let tmp = TempDir::new().unwrap();
    write_migration(tmp.path(), "1_a.sql", "SELECT 1; SELECT 2;");

    let output = migrax(tmp.path(), &["up", "--dry-run"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Would apply 1_a.sql (2 statements)"));

    let conn = Connection::open(tmp.path().join("migrax.db")).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'migrations'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn test_down_without_script_reports_soft_rollback() {
    let tmp = TempDir::new().unwrap();
    write_migration(tmp.path(), "1_a.sql", "CREATE TABLE a (id INTEGER);");
    assert_success(&migrax(tmp.path(), &["up"]));

    let output = migrax(tmp.path(), &["down"]);
    assert_success(&output);
    assert!(stdout(&output).contains("no down script"));
    assert!(ledger_filenames(&tmp.path().join("migrax.db")).is_empty());

    let output = migrax(tmp.path(), &["down"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Nothing to roll back"));
}

#[test]
fn test_status_json() {
    let tmp = TempDir::new().unwrap();
    write_migration(tmp.path(), "1_a.sql", "SELECT 1;");
    write_migration(tmp.path(), "2_b.sql", "SELECT 2;");
    assert_success(&migrax(tmp.path(), &["up"]));
    write_migration(tmp.path(), "3_c.sql", "SELECT 3;");

    let output = migrax(tmp.path(), &["status", "--json"]);
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["executed"].as_array().unwrap().len(), 2);
    assert_eq!(json["executed"][0]["filename"], "1_a.sql");
    assert_eq!(json["pending"], serde_json::json!(["3_c.sql"]));
}

#[test]
fn test_create_then_up_with_flags() {
    let tmp = TempDir::new().unwrap();

    let output = migrax(
        tmp.path(),
        &["--dir", "db/changes", "create", "Add Widgets", "--with-rollback"],
    );
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_add_widgets.sql"));
    assert!(out.contains("_add_widgets_rollback.sql"));

    let names: Vec<String> = fs::read_dir(tmp.path().join("db/changes"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2);

    let output = migrax(
        tmp.path(),
        &["up", "--dir", "db/changes", "--db", "custom.db"],
    );
    assert_success(&output);
    assert_eq!(ledger_filenames(&tmp.path().join("custom.db")).len(), 1);
}

#[test]
fn test_config_file_sets_ledger_table() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("migrax.toml"),
        "database = \"app.db\"\nledger_table = \"schema_history\"\n",
    )
    .unwrap();
    write_migration(tmp.path(), "1_a.sql", "SELECT 1;");

    assert_success(&migrax(tmp.path(), &["up"]));

    let conn = Connection::open(tmp.path().join("app.db")).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_history", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_invalid_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("migrax.toml"),
        "ledger_table = \"bad name; DROP\"\n",
    )
    .unwrap();

    let output = migrax(tmp.path(), &["status"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error [ERR_INVALID_CONFIG]"));
    assert!(stderr.contains("Invalid configuration"));
}
