// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome records: the append-only task history backing learning aggregates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

crate::define_id!(OutcomeId, "out-");

/// One completed (or failed) task attempt, as reported by the supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub id: OutcomeId,
    pub task_type: String,
    pub npc_id: String,
    pub success: bool,
    pub yield_amount: f64,
    pub environment_tag: String,
    pub duration_ms: u64,
    pub hazards: Vec<String>,
    pub timestamp: u64,
    pub metadata: HashMap<String, String>,
}

crate::builder! {
    pub struct OutcomeRecordBuilder => OutcomeRecord {
        into {
            task_type: String = "mine",
            npc_id: String = "npc",
            environment_tag: String = "overworld",
        }
        set {
            success: bool = true,
            yield_amount: f64 = 0.0,
            duration_ms: u64 = 0,
            hazards: Vec<String> = Vec::new(),
            timestamp: u64 = 0,
            metadata: HashMap<String, String> = HashMap::new(),
        }
        computed {
            id: OutcomeId = OutcomeId::new(),
        }
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
