#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! once assert_cmd 2.1 is the minimum

use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::TestWorkspace;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("cool").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coolify"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("provision"))
        .stdout(predicate::str::contains("kick"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("cool").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coolflow"));
}

#[test]
fn test_deploy_help() {
    let mut cmd = Command::cargo_bin("cool").unwrap();
    cmd.arg("deploy")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("--tag"))
        .stdout(predicate::str::contains("--wait"));
}

#[test]
fn test_deploy_tag_conflicts_with_uuid() {
    let mut cmd = Command::cargo_bin("cool").unwrap();
    cmd.args(["deploy", "--uuid", "app-1", "--tag", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("cool").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

#[test]
fn test_status_without_credentials_fails() {
    let ws = TestWorkspace::new();

    ws.cool()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("COOLIFY_URL"));
}

#[test]
fn test_sync_dry_run_needs_env_file() {
    let ws = TestWorkspace::new();

    ws.cool_against("http://127.0.0.1:9")
        .args(["sync", "--dry-run", "--file", "missing.env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.env not found"));
}

#[test]
fn test_env_bookmarks_lifecycle() {
    let ws = TestWorkspace::new();

    ws.cool()
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved environments"));

    ws.cool()
        .args(["env", "add", "staging", "--environment", "staging"])
        .args(["--project", "proj-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default environment"));

    ws.cool()
        .args(["env", "add", "prod", "--environment", "production"])
        .assert()
        .success();

    ws.cool()
        .args(["env", "use", "prod"])
        .assert()
        .success();

    ws.cool()
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("staging"))
        .stdout(predicate::str::contains("proj-1"))
        .stdout(predicate::str::contains("* prod"));

    ws.cool()
        .args(["env", "remove", "staging"])
        .assert()
        .success();

    ws.cool()
        .args(["env", "use", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}
