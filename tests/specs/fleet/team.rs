// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::fleetctl;

#[test]
fn unknown_preset_fails_without_mutating_the_registry() {
    let dir = tempfile::tempdir().unwrap();
    let out = fleetctl(dir.path(), &["spawn-team", "siege"]);
    assert!(!out.status.success());

    let list = fleetctl(dir.path(), &["--output", "json", "list"]);
    let value: serde_json::Value = serde_json::from_slice(&list.stdout).unwrap();
    assert!(value.as_array().unwrap().is_empty());
}

#[test]
fn balanced_preset_expands_into_five_bots_across_five_roles() {
    let dir = tempfile::tempdir().unwrap();
    let out = fleetctl(dir.path(), &["--output", "json", "spawn-team", "balanced"]);
    assert!(out.status.success());

    let list = fleetctl(dir.path(), &["--output", "json", "list"]);
    let value: serde_json::Value = serde_json::from_slice(&list.stdout).unwrap();
    let bots = value.as_array().unwrap();
    assert_eq!(bots.len(), 5);

    let mut roles: Vec<String> =
        bots.iter().map(|b| b["role"].as_str().unwrap().to_string()).collect();
    roles.sort();
    assert_eq!(roles, ["builder", "explorer", "farmer", "guard", "miner"]);
}
