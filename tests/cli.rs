//! CLI behaviour of the server binary
//!
//! Only paths that exit without binding a socket are exercised here.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Run the binary from an empty directory with a clean environment
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("region-ping").unwrap();
    cmd.current_dir(dir.path()).env_clear();
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--attempts"))
        .stdout(predicate::str::contains("--region-endpoint"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_builtin_regions() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--list-regions")
        .assert()
        .success()
        .stdout(predicate::str::contains("us-east-1"))
        .stdout(predicate::str::contains("eu-west-1"));
}

#[test]
fn test_list_regions_override_from_cli() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--list-regions", "--regions", "eu-central-1=Frankfurt;ap-south-1=Mumbai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Frankfurt"))
        .stdout(predicate::str::contains("Mumbai"))
        .stdout(predicate::str::contains("us-east-1").not());
}

#[test]
fn test_list_regions_override_from_env_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "REGIONS=\"sa-east-1=Sao Paulo\"\n").unwrap();

    create_test_cmd(&dir)
        .arg("--list-regions")
        .assert()
        .success()
        .stdout(predicate::str::contains("sa-east-1"))
        .stdout(predicate::str::contains("us-east-1").not());
}

#[test]
fn test_env_help() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--env-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROBE_ATTEMPTS"))
        .stdout(predicate::str::contains("REGION_ENDPOINT"));
}

#[test]
fn test_invalid_attempts_exit_with_config_code() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--attempts", "0", "--list-regions"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn test_invalid_env_file_value_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "REGION_TIMEOUT_SECONDS=0\n").unwrap();

    create_test_cmd(&dir)
        .arg("--list-regions")
        .assert()
        .code(1);
}

#[test]
fn test_endpoint_without_placeholder_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--region-endpoint", "https://example.com/", "--list-regions"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("{code}"));
}

#[test]
fn test_unknown_log_format_rejected_by_parser() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--log-format", "xml"])
        .assert()
        .failure();
}

#[test]
fn test_create_env_writes_loadable_example() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--create-env")
        .assert()
        .success()
        .stdout(predicate::str::contains(".env"));

    let content = fs::read_to_string(dir.path().join(".env")).unwrap();
    assert!(content.contains("PROBE_ATTEMPTS"));

    // The written file is picked up on the next start without errors
    create_test_cmd(&dir)
        .arg("--list-regions")
        .assert()
        .success()
        .stdout(predicate::str::contains("us-east-1"));
}

#[test]
fn test_create_env_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "PORT=9000\n").unwrap();

    create_test_cmd(&dir)
        .arg("--create-env")
        .assert()
        .code(1);

    assert_eq!(fs::read_to_string(dir.path().join(".env")).unwrap(), "PORT=9000\n");
}
