// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::{fleetctl, stdout};

// `fleetctl spawn` never starts the adapter's background connection loop
// (only `fleetctl serve` does), so a spawn always dead-letters here —
// this exercises the dead-letter path deterministically without a game
// server, same as a real first-attempt connection failure would.

#[test]
fn a_spawn_without_a_reachable_game_server_lands_in_the_dead_letter_queue() {
    let dir = tempfile::tempdir().unwrap();
    let spawn = fleetctl(dir.path(), &["spawn", "--role", "explorer", "--name", "scout"]);
    assert!(spawn.status.success());
    assert!(stdout(&spawn).to_lowercase().contains("dead"));

    let list = fleetctl(dir.path(), &["dead-letters", "list"]);
    assert!(stdout(&list).contains("scout"));
}

#[test]
fn retrying_an_unreachable_dead_letter_reports_it_as_a_failure_not_a_success() {
    let dir = tempfile::tempdir().unwrap();
    fleetctl(dir.path(), &["spawn", "--role", "explorer", "--name", "scout"]);

    let retry = fleetctl(dir.path(), &["--output", "json", "dead-letters", "retry"]);
    assert!(retry.status.success());
    let value: serde_json::Value = serde_json::from_slice(&retry.stdout).unwrap();
    assert_eq!(value["successes"].as_array().unwrap().len(), 0);
    assert_eq!(value["failures"].as_array().unwrap().len(), 1);

    let list = fleetctl(dir.path(), &["dead-letters", "list"]);
    assert!(stdout(&list).contains("scout"));
}

#[test]
fn draining_an_empty_dead_letter_queue_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let retry = fleetctl(dir.path(), &["--output", "json", "dead-letters", "retry"]);
    assert!(retry.status.success());
    let value: serde_json::Value = serde_json::from_slice(&retry.stdout).unwrap();
    assert!(value["successes"].as_array().unwrap().is_empty());
    assert!(value["failures"].as_array().unwrap().is_empty());
}
