// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::process::Output;

use assert_cmd::Command;

pub fn fleetctl(state_dir: &Path, args: &[&str]) -> Output {
    Command::cargo_bin("fleetctl")
        .unwrap()
        .env("FLEET_STATE_DIR", state_dir)
        .env("FLEET_RCON_PASSWORD", "test-password")
        .args(args)
        .output()
        .unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
