// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Tunables for one [`crate::BotSupervisor`] instance.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Cap on `count(status == active)`, mirrored from the registry default.
    pub max_active: usize,
    pub max_retries: u32,
    /// Base delay; attempt `n` (1-based) waits `retry_delay * 2^(n-1)`.
    pub retry_delay: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_active: fleet_registry::DEFAULT_MAX_ACTIVE,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl SupervisorConfig {
    /// Delay before spawn attempt `attempt` (1-based).
    pub fn retry_delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(10);
        self.retry_delay.saturating_mul(1u32 << exp)
    }
}
