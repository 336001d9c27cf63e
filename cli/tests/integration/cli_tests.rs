//! CLI structure and argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn nanobot_deploy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nanobot-deploy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    nanobot_deploy()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("running nanobot gateway container"));
}

#[test]
fn test_cli_help_lists_both_setup_profiles() {
    nanobot_deploy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup-amd2gb"))
        .stdout(predicate::str::contains("setup-rpi4gb"))
        .stdout(predicate::str::contains("update"));
}

#[test]
fn test_version_command_shows_version() {
    nanobot_deploy()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "nanobot-deploy {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = nanobot_deploy()
        .args(["version", "--json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_setup_rejects_arguments() {
    nanobot_deploy()
        .args(["setup-amd2gb", "extra"])
        .assert()
        .code(2);
}

#[test]
fn test_agent_requires_message() {
    nanobot_deploy()
        .arg("agent")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--message"));
}

#[test]
fn test_unknown_command_fails() {
    nanobot_deploy().arg("bogus").assert().code(2);
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    for value in ["1", "true", "yes", ""] {
        Command::new(assert_cmd::cargo::cargo_bin!("nanobot-deploy"))
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("nanobot-deploy"));
    }
}
