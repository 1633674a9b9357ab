// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Tunables for one [`crate::GameServerAdapter`] instance. All duration
/// fields below their stated floor are clamped up to it.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub max_commands_per_second: u32,
    pub command_timeout: Duration,
    pub heartbeat_interval: Duration,
    pub heartbeat_command: String,
    pub snapshot_interval: Duration,
    pub snapshot_persistence_interval: Option<Duration>,
    pub cleanup_interval: Duration,
    pub combatant_ttl: Duration,
    pub history_capacity: usize,
    pub history_ttl: Duration,
    pub dedup_window: Duration,
    pub damage_window: Duration,
    pub reconnect_base_delay: Duration,
    pub max_reconnect_delay: Duration,
    pub command_prefix: String,
    /// Delay between the summon command and any post-spawn appearance commands.
    pub post_spawn_delay: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_commands_per_second: 10,
            command_timeout: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(30),
            heartbeat_command: "/list".to_string(),
            snapshot_interval: Duration::from_secs(5),
            snapshot_persistence_interval: Some(Duration::from_secs(60)),
            cleanup_interval: Duration::from_secs(60),
            combatant_ttl: Duration::from_secs(5 * 60),
            history_capacity: 500,
            history_ttl: Duration::from_secs(10 * 60),
            dedup_window: Duration::from_secs(2),
            damage_window: Duration::from_secs(10),
            reconnect_base_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
            command_prefix: "!task".to_string(),
            post_spawn_delay: Duration::from_millis(250),
        }
    }
}

impl AdapterConfig {
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout.max(Duration::from_secs(1))
    }

    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval.max(Duration::from_secs(5))
    }

    pub fn snapshot_interval(&self) -> Duration {
        self.snapshot_interval.max(Duration::from_secs(1))
    }

    pub fn snapshot_persistence_interval(&self) -> Option<Duration> {
        self.snapshot_persistence_interval
            .map(|d| d.max(Duration::from_secs(5)))
    }

    /// Minimum spacing between successful sends, derived from the rate cap.
    pub fn min_command_spacing(&self) -> Duration {
        Duration::from_millis(1000 / self.max_commands_per_second.max(1) as u64)
    }

    /// Delay before reconnect attempt `attempt` (0-based).
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.min(10);
        let scaled = self.reconnect_base_delay.saturating_mul(1u32 << exp);
        scaled.min(self.max_reconnect_delay)
    }
}
