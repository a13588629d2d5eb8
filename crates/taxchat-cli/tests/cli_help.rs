//! Integration tests for CLI argument handling.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_subcommands() {
    cargo_bin_cmd!("taxchat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("taxchat")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taxchat"));
}

#[test]
fn test_send_requires_message() {
    cargo_bin_cmd!("taxchat")
        .arg("send")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--message"));
}

#[test]
fn test_unknown_flag_fails() {
    cargo_bin_cmd!("taxchat")
        .arg("--definitely-not-a-flag")
        .assert()
        .failure();
}

#[test]
fn test_invalid_role_is_rejected() {
    let home = TempDir::new().unwrap();
    cargo_bin_cmd!("taxchat")
        .env("TAXCHAT_HOME", home.path())
        .args(["--role", "auditor", "config", "path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown role"));
}

#[test]
fn test_config_path_respects_home_env() {
    let home = TempDir::new().unwrap();
    cargo_bin_cmd!("taxchat")
        .env("TAXCHAT_HOME", home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_reinit_fails() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("taxchat")
        .env("TAXCHAT_HOME", home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    cargo_bin_cmd!("taxchat")
        .env("TAXCHAT_HOME", home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
