//! `update` preconditions that hold before any fetch or pipeline stage.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn nanobot_deploy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nanobot-deploy"));
    cmd.env("NO_COLOR", "1").env_remove("CI");
    cmd
}

/// Config pointing the persistent config dir and source dir into `dir`.
fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("config.yaml");
    let yaml = format!(
        "paths:\n  config_dir: {}\n  source_dir: {}\n{extra}",
        dir.join(".nanobot").display(),
        dir.join("src").display(),
    );
    std::fs::write(&path, yaml).expect("write config");
    path
}

#[test]
fn test_update_rejects_unknown_target() {
    nanobot_deploy()
        .args(["update", "x86"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected 'amd' or 'rpi'"));
}

#[test]
fn test_update_on_unconfigured_host_points_to_setup() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "");
    nanobot_deploy()
        .env("NANOBOT_DEPLOY_CONFIG", &config)
        .args(["update", "amd"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("has not been set up yet"))
        .stderr(predicate::str::contains("setup-amd2gb"));
}

#[test]
fn test_update_json_error_has_code() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "");
    let output = nanobot_deploy()
        .env("NANOBOT_DEPLOY_CONFIG", &config)
        .args(["--json", "update", "rpi"])
        .output()
        .expect("run binary");
    assert_eq!(output.status.code(), Some(4));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "precondition_failed");
}

#[test]
fn test_update_with_no_enabled_profile_fails() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "profiles: []\n");
    nanobot_deploy()
        .env("NANOBOT_DEPLOY_CONFIG", &config)
        .arg("update")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No setup profile is available"));
}

#[test]
fn test_update_with_disabled_profile_fails() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "profiles: [amd2gb]\n");
    nanobot_deploy()
        .env("NANOBOT_DEPLOY_CONFIG", &config)
        .args(["update", "rpi"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("'rpi4gb' is not enabled"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "service:\n  port: 0\n");
    nanobot_deploy()
        .env("NANOBOT_DEPLOY_CONFIG", &config)
        .arg("update")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("service.port"));
}
