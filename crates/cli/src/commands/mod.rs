// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod dead_letter;
pub mod despawn;
pub mod list;
pub mod respawn;
pub mod serve;
pub mod spawn;
pub mod team;

/// Parse a `--role` flag into a [`fleet_core::BotRole`], falling back to a
/// custom role for any name outside the fixed archetypes.
pub fn parse_role(raw: &str) -> fleet_core::BotRole {
    match raw.to_ascii_lowercase().as_str() {
        "miner" => fleet_core::BotRole::Miner,
        "builder" => fleet_core::BotRole::Builder,
        "explorer" => fleet_core::BotRole::Explorer,
        "guard" => fleet_core::BotRole::Guard,
        "farmer" => fleet_core::BotRole::Farmer,
        _ => fleet_core::BotRole::Custom(raw.to_string()),
    }
}
