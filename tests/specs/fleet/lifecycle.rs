// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::{fleetctl, stdout};

#[test]
fn fresh_state_dir_has_no_bots() {
    let dir = tempfile::tempdir().unwrap();
    let out = fleetctl(dir.path(), &["list"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("No bots registered"));
}

#[test]
fn spawn_registers_a_profile_even_without_a_live_game_server() {
    let dir = tempfile::tempdir().unwrap();
    let spawn = fleetctl(dir.path(), &["spawn", "--role", "miner", "--name", "pickaxe-pete"]);
    assert!(spawn.status.success());

    let list = fleetctl(dir.path(), &["list"]);
    assert!(stdout(&list).contains("pickaxe-pete"));
}

#[test]
fn list_role_filter_only_shows_matching_bots() {
    let dir = tempfile::tempdir().unwrap();
    fleetctl(dir.path(), &["spawn", "--role", "miner", "--name", "digger"]);
    fleetctl(dir.path(), &["spawn", "--role", "guard", "--name", "sentry"]);

    let miners = fleetctl(dir.path(), &["list", "--role", "miner"]);
    let out = stdout(&miners);
    assert!(out.contains("digger"));
    assert!(!out.contains("sentry"));
}

#[test]
fn despawn_of_an_unknown_bot_exits_with_code_two() {
    let dir = tempfile::tempdir().unwrap();
    let out = fleetctl(dir.path(), &["despawn", "bot-does-not-exist"]);
    assert_eq!(out.status.code(), Some(2));
}
