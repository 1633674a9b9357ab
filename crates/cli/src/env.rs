// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Resolve state directory: FLEET_STATE_DIR > XDG_STATE_HOME/fleet > ~/.local/state/fleet
pub fn state_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("FLEET_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("fleet"));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not resolve home directory"))?;
    Ok(home.join(".local/state/fleet"))
}

/// Address of the game server the adapter connects to.
pub fn game_server_addr() -> String {
    std::env::var("FLEET_GAME_SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:25575".to_string())
}

/// Bind address for the push-channel (combat snapshot/event) server.
pub fn push_bind_addr() -> anyhow::Result<SocketAddr> {
    let raw = std::env::var("FLEET_PUSH_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8089".to_string());
    raw.parse().map_err(|e| anyhow::anyhow!("invalid FLEET_PUSH_BIND_ADDR {raw:?}: {e}"))
}

/// RCON password for the game-server connection. Required: empty or unset
/// is rejected by the caller, never silently treated as "no password".
pub fn rcon_password() -> Option<String> {
    std::env::var("FLEET_RCON_PASSWORD").ok().filter(|p| !p.is_empty())
}

/// Interval on which `fleetctl serve` consults policy hooks, if configured.
pub fn policy_interval() -> Duration {
    std::env::var("FLEET_POLICY_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}
