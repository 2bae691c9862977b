//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn soma() -> Command {
    let mut cmd = Command::cargo_bin("soma-analytics").unwrap();
    cmd.env_remove("DATABASE_URL")
        .env_remove("SOMA_BIND")
        .env_remove("PORT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_top_level_help_lists_commands() {
    soma()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_serve_help() {
    soma()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_report_help() {
    soma()
        .arg("report")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compact JSON"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let cwd = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();

    soma()
        .current_dir(cwd.path())
        .env("HOME", home.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn test_report_rejects_malformed_database_url() {
    let cwd = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();

    soma()
        .current_dir(cwd.path())
        .env("HOME", home.path())
        .arg("report")
        .arg("--database-url")
        .arg("not a url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[cfg(not(feature = "telemetry"))]
#[test]
fn test_otel_flag_without_feature_warns_on_stderr() {
    let cwd = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();

    soma()
        .current_dir(cwd.path())
        .env("HOME", home.path())
        .arg("--otel")
        .arg("report")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--otel ignored"))
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn test_unknown_subcommand_fails() {
    soma().arg("migrate").assert().failure();
}
