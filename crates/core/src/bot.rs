// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bot identity: the registry entry persisted on disk across restarts.

use serde::{Deserialize, Serialize};

use crate::personality::{PersonalityBundle, PersonalityVector};

crate::define_id!(BotId, "bot-");

/// Worker archetype a bot was spawned as.
///
/// `Custom` keeps this forward-compatible with roles added without a core
/// release, mirroring how downstream consumers should treat unrecognized
/// variants of any tagged enum in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotRole {
    Miner,
    Builder,
    Explorer,
    Guard,
    Farmer,
    Custom(String),
}

impl std::fmt::Display for BotRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Miner => f.write_str("miner"),
            Self::Builder => f.write_str("builder"),
            Self::Explorer => f.write_str("explorer"),
            Self::Guard => f.write_str("guard"),
            Self::Farmer => f.write_str("farmer"),
            Self::Custom(s) => f.write_str(s),
        }
    }
}

/// Lifecycle status of a registry entry.
///
/// Valid transitions: `Idle -> Active -> Inactive`; a respawn re-enters
/// `Active` directly from `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStatus {
    Idle,
    Active,
    Inactive,
}

crate::simple_display! {
    BotStatus {
        Idle => "idle",
        Active => "active",
        Inactive => "inactive",
    }
}

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

/// The persisted registry entry for one bot.
///
/// Invariants: `id` is unique within a registry; `personality` components
/// are finite and in `[0,1]`; `status` only moves `idle -> active ->
/// inactive` (a respawn takes `inactive -> active` directly); `spawn_count`
/// is monotonic non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub id: BotId,
    pub name: String,
    pub role: BotRole,
    pub world_entity_type: String,
    pub personality: PersonalityVector,
    pub personality_bundle: PersonalityBundle,
    pub appearance: String,
    pub spawn_position: Position,
    pub last_known_position: Position,
    pub description: String,
    pub status: BotStatus,
    pub spawn_count: u64,
    pub created_at: u64,
    pub updated_at: u64,
    pub last_spawned_at: Option<u64>,
    pub last_despawned_at: Option<u64>,
    /// Operator-authored annotations, never written by the system itself.
    pub notes: Vec<String>,
    /// Free-form labels for operator-side grouping/filtering.
    pub tags: Vec<String>,
}

impl BotIdentity {
    /// Recompute `personality_bundle` from `personality`. Called on every upsert.
    pub fn refresh_bundle(&mut self) {
        self.personality_bundle = self.personality.bundle();
    }
}

crate::builder! {
    pub struct BotIdentityBuilder => BotIdentity {
        into {
            name: String = "bot",
            world_entity_type: String = "villager",
            appearance: String = "default",
            description: String = "",
        }
        set {
            role: BotRole = BotRole::Miner,
            personality: PersonalityVector = PersonalityVector::balanced(),
            spawn_position: Position = Position::default(),
            last_known_position: Position = Position::default(),
            status: BotStatus = BotStatus::Idle,
            spawn_count: u64 = 0,
            created_at: u64 = 0,
            updated_at: u64 = 0,
            last_spawned_at: Option<u64> = None,
            last_despawned_at: Option<u64> = None,
            notes: Vec<String> = Vec::new(),
            tags: Vec<String> = Vec::new(),
        }
        computed {
            id: BotId = BotId::new(),
            personality_bundle: PersonalityBundle = self.personality.bundle(),
        }
    }
}

#[cfg(test)]
#[path = "bot_tests.rs"]
mod tests;
