// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy hooks: an external scoring object proposes actions from a fixed
//! taxonomy; this module only honors what comes back — clamping to each
//! action's cooldown window and applying numeric payloads monotonically.
//! The scoring algorithm itself is someone else's concern.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

/// Point-in-time counters handed to a [`PolicyHooks`] implementation.
#[derive(Debug, Clone, Default)]
pub struct PolicyMetrics {
    pub active_bots: usize,
    pub dead_lettered: usize,
    pub commands_failed: u64,
    pub reconnect_count: u64,
}

/// One action a policy may request. Every variant carries the cooldown the
/// policy wants enforced before the same action key may fire again.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyAction {
    AdjustPolicy { key: String, value: f64, cooldown: Duration },
    RebalanceNode { node_id: String, cooldown: Duration },
    ScaleDown { max_active: usize, cooldown: Duration },
}

impl PolicyAction {
    fn key(&self) -> String {
        match self {
            Self::AdjustPolicy { key, .. } => format!("adjust_policy:{key}"),
            Self::RebalanceNode { node_id, .. } => format!("rebalance_node:{node_id}"),
            Self::ScaleDown { .. } => "scale_down".to_string(),
        }
    }

    fn cooldown(&self) -> Duration {
        match self {
            Self::AdjustPolicy { cooldown, .. }
            | Self::RebalanceNode { cooldown, .. }
            | Self::ScaleDown { cooldown, .. } => *cooldown,
        }
    }

    /// Numeric payload used for monotonic clamping, if this action has one.
    fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::AdjustPolicy { value, .. } => Some(*value),
            Self::ScaleDown { max_active, .. } => Some(*max_active as f64),
            Self::RebalanceNode { .. } => None,
        }
    }
}

/// An external scorer the supervisor consults periodically.
pub trait PolicyHooks: Send + Sync {
    fn evaluate(&self, metrics: &PolicyMetrics) -> Vec<PolicyAction>;
}

#[derive(Default)]
struct AppliedState {
    last_applied_at: HashMap<String, u64>,
    last_value: HashMap<String, f64>,
}

/// Tracks cooldown windows and last-applied payload per action key so that
/// repeated [`PolicyHooks::evaluate`] calls only take effect within their
/// policy's own constraints.
#[derive(Default)]
pub struct PolicyState {
    state: Mutex<AppliedState>,
}

impl PolicyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter `actions` down to the ones that clear their cooldown and (for
    /// numeric payloads) move the tracked value in a non-decreasing
    /// direction, then record their timestamp and payload as applied.
    pub fn apply(&self, actions: Vec<PolicyAction>, now_ms: u64) -> Vec<PolicyAction> {
        let mut state = self.state.lock();
        let mut applied = Vec::with_capacity(actions.len());
        for action in actions {
            let key = action.key();
            if let Some(last) = state.last_applied_at.get(&key) {
                if now_ms.saturating_sub(*last) < action.cooldown().as_millis() as u64 {
                    continue;
                }
            }
            if let Some(value) = action.numeric_value() {
                if let Some(previous) = state.last_value.get(&key) {
                    if value < *previous {
                        continue;
                    }
                }
                state.last_value.insert(key.clone(), value);
            }
            state.last_applied_at.insert(key, now_ms);
            applied.push(action);
        }
        applied
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
