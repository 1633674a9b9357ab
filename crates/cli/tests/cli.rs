// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use assert_cmd::Command;

#[test]
fn list_on_a_fresh_state_dir_reports_no_bots() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("fleetctl")
        .unwrap()
        .env("FLEET_STATE_DIR", dir.path())
        .arg("list")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No bots registered"));
}

#[test]
fn despawn_of_an_unknown_bot_exits_with_code_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("fleetctl")
        .unwrap()
        .env("FLEET_STATE_DIR", dir.path())
        .args(["despawn", "bot-does-not-exist"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn spawn_team_rejects_an_unknown_preset() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("fleetctl")
        .unwrap()
        .env("FLEET_STATE_DIR", dir.path())
        .args(["spawn-team", "siege"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
