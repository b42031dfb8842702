//! CLI integration tests for oxide-ddl.
//!
//! These tests verify argument parsing, rendered output and exit codes
//! for the `render` and `dialects` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the oxide-ddl binary.
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("oxide-ddl").unwrap();
    cmd.env_remove("OXIDE_DDL_DIALECT")
        .env_remove("OXIDE_DDL_COMPATIBILITY");
    cmd
}

const USERS_WITH_FK: &str = r#"[
    {"op": "create_table", "name": "Users", "columns": [
        {"name": "id", "sql_type": "integer", "nullable": false, "primary_key": true},
        {"name": "role_id", "sql_type": "integer"}
    ]},
    {"op": "create_foreign_key", "foreign_key": {
        "name": "FK_Users_Roles",
        "foreign_table": "Users", "foreign_columns": ["role_id"],
        "primary_table": "Roles", "primary_columns": ["id"],
        "on_delete": "cascade"
    }}
]"#;

const DROP_COLUMN: &str = r#"[
    {"op": "delete_column", "table": "Users", "column": "legacy"},
    {"op": "rename_table", "old_name": "Users", "new_name": "Members"}
]"#;

fn operations_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{json}").unwrap();
    file
}

// =============================================================================
// Help and Listing Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("dialects"));
}

#[test]
fn test_render_subcommand_help() {
    cmd()
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dialect"))
        .stdout(predicate::str::contains("--compatibility"))
        .stdout(predicate::str::contains("--strict-references"))
        .stdout(predicate::str::contains("[default: sqlite]"));
}

#[test]
fn test_dialects_lists_every_dialect() {
    cmd()
        .arg("dialects")
        .assert()
        .success()
        .stdout("generic\nsqlite\npostgres\n");
}

// =============================================================================
// Render Tests
// =============================================================================

#[test]
fn test_render_inlines_foreign_key() {
    let file = operations_file(USERS_WITH_FK);

    cmd()
        .arg("render")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            "CREATE TABLE Users (id INTEGER PRIMARY KEY, role_id INTEGER, \
             CONSTRAINT FK_Users_Roles FOREIGN KEY (role_id) REFERENCES Roles (id) \
             ON DELETE CASCADE);\n",
        );
}

#[test]
fn test_render_from_stdin() {
    cmd()
        .args(["render", "-", "--dialect", "postgres"])
        .write_stdin(USERS_WITH_FK)
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE \"Users\""))
        .stdout(predicate::str::contains(
            "ALTER TABLE \"Users\" ADD CONSTRAINT \"FK_Users_Roles\"",
        ));
}

#[test]
fn test_dialect_from_env() {
    let file = operations_file(DROP_COLUMN);

    cmd()
        .env("OXIDE_DDL_DIALECT", "postgres")
        .arg("render")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ALTER TABLE \"Users\" DROP COLUMN legacy;"));
}

#[test]
fn test_strict_mode_fails_on_unsupported_operation() {
    let file = operations_file(DROP_COLUMN);

    cmd()
        .arg("render")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("SQLite does not support deleting column Users.legacy"));
}

#[test]
fn test_loose_mode_skips_unsupported_operation() {
    let file = operations_file(DROP_COLUMN);

    cmd()
        .args(["render", "--compatibility", "loose"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("ALTER TABLE Users RENAME TO Members;\n")
        .stderr(predicate::str::contains("Skipping unsupported operation"));
}

#[test]
fn test_strict_references() {
    let file = operations_file(
        r#"[{"op": "create_constraint", "constraint": {
            "name": "pk_orders", "table_name": "orders", "columns": ["id"], "kind": "primary_key"
        }}]"#,
    );

    cmd()
        .args(["render", "--strict-references"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unresolved constraint 'pk_orders'"));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_unknown_dialect() {
    let file = operations_file("[]");

    cmd()
        .args(["render", "--dialect", "oracle"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn test_missing_input_file() {
    cmd()
        .args(["render", "/nonexistent/operations.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read operations"));
}

#[test]
fn test_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{\"op\": ").unwrap();

    cmd()
        .arg("render")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid operations"));
}
