// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dead-letter entries: spawns whose retries were exhausted.

use serde::{Deserialize, Serialize};

use crate::bot::{BotIdentity, Position};

crate::define_id!(DeadLetterId, "dlq-");

/// A spawn attempt that exhausted its retry budget.
///
/// The registry entry for `profile` is left in place (only the spawn
/// attempt failed, not the identity); `fail_count` accumulates across
/// repeated drain attempts for the same bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetterEntry {
    pub id: DeadLetterId,
    pub profile: BotIdentity,
    pub intended_position: Position,
    pub last_error: String,
    pub fail_count: u32,
    pub timestamp: u64,
}

crate::builder! {
    pub struct DeadLetterEntryBuilder => DeadLetterEntry {
        into {
            last_error: String = "spawn failed",
        }
        set {
            profile: BotIdentity = BotIdentity::builder().build(),
            intended_position: Position = Position::default(),
            fail_count: u32 = 1,
            timestamp: u64 = 0,
        }
        computed {
            id: DeadLetterId = DeadLetterId::new(),
        }
    }
}

#[cfg(test)]
#[path = "dead_letter_tests.rs"]
mod tests;
