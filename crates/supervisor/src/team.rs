// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named team presets: a fixed role composition expanded into a batch of
//! spawn requests by [`crate::BotSupervisor::spawn_team`].

use fleet_core::BotRole;

use crate::error::SupervisorError;

/// One member of an expanded team preset: a role and how many bots of it.
pub struct PresetMember {
    pub role: BotRole,
    pub count: usize,
}

/// Resolve a named preset to its role composition, or an error if the name
/// isn't one of the fixed presets.
pub fn resolve_preset(name: &str) -> Result<Vec<PresetMember>, SupervisorError> {
    let members = match name {
        "mining" => vec![PresetMember { role: BotRole::Miner, count: 3 }],
        "building" => vec![PresetMember { role: BotRole::Builder, count: 2 }],
        "exploration" => vec![PresetMember { role: BotRole::Explorer, count: 2 }],
        "combat" => vec![PresetMember { role: BotRole::Guard, count: 2 }],
        "farming" => vec![PresetMember { role: BotRole::Farmer, count: 2 }],
        "balanced" => vec![
            PresetMember { role: BotRole::Miner, count: 1 },
            PresetMember { role: BotRole::Builder, count: 1 },
            PresetMember { role: BotRole::Explorer, count: 1 },
            PresetMember { role: BotRole::Guard, count: 1 },
            PresetMember { role: BotRole::Farmer, count: 1 },
        ],
        other => return Err(SupervisorError::UnknownPreset(other.to_string())),
    };
    Ok(members)
}

#[cfg(test)]
#[path = "team_tests.rs"]
mod tests;
