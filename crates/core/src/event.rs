// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle events emitted by persistence, learning, the registry, the
//! supervisor, the microcore, and the adapter. This is the "local
//! subscriber" event stream fed into the event bus — distinct from the
//! combat-event stream in [`crate::combat`], which has its own cadence
//! and dedup rules.
//!
//! Every variant is `#[serde(rename = "category:action")]`, one tagged
//! enum, with a catch-all [`Event::Custom`] so forward-compatible
//! consumers never fail to deserialize an event they don't recognize yet.

use serde::{Deserialize, Serialize};

use crate::bot::{BotId, Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "persistence:saved")]
    PersistenceSaved { path: String, at: u64 },

    #[serde(rename = "persistence:load_failed")]
    PersistenceLoadFailed {
        path: String,
        reason: String,
        at: u64,
    },

    #[serde(rename = "persistence:loaded")]
    PersistenceLoaded { path: String, at: u64 },

    #[serde(rename = "learning:outcome_recorded")]
    OutcomeRecorded {
        npc: String,
        task: String,
        success: bool,
        at: u64,
    },

    #[serde(rename = "learning:task_completed")]
    TaskCompleted { npc: String, task: String, at: u64 },

    #[serde(rename = "learning:yield_recorded")]
    YieldRecorded {
        npc: String,
        task: String,
        amount: f64,
        at: u64,
    },

    #[serde(rename = "learning:hazard_encountered")]
    HazardEncountered {
        npc: String,
        hazard: String,
        at: u64,
    },

    #[serde(rename = "registry:bot_created")]
    BotCreated { id: BotId, at: u64 },

    #[serde(rename = "registry:bot_updated")]
    BotUpdated { id: BotId, at: u64 },

    #[serde(rename = "supervisor:bot_spawned")]
    BotSpawned {
        id: BotId,
        position: Position,
        at: u64,
    },

    #[serde(rename = "supervisor:bot_despawned")]
    BotDespawned { id: BotId, at: u64 },

    #[serde(rename = "supervisor:spawn_retry_scheduled")]
    SpawnRetryScheduled { id: BotId, attempt: u32, at: u64 },

    #[serde(rename = "supervisor:dead_lettered")]
    DeadLettered {
        id: BotId,
        fail_count: u32,
        at: u64,
    },

    #[serde(rename = "supervisor:dead_letter_drained")]
    DeadLetterDrained {
        successes: u32,
        failures: u32,
        at: u64,
    },

    #[serde(rename = "microcore:move")]
    MicrocoreMove {
        id: BotId,
        position: Position,
        at: u64,
    },

    #[serde(rename = "microcore:task_complete")]
    MicrocoreTaskComplete { id: BotId, task: String, at: u64 },

    #[serde(rename = "microcore:error")]
    MicrocoreError { id: BotId, reason: String, at: u64 },

    #[serde(rename = "microcore:status")]
    MicrocoreStatus {
        id: BotId,
        reason: String,
        tick_count: u64,
        at: u64,
    },

    #[serde(rename = "adapter:connected")]
    AdapterConnected { at: u64 },

    #[serde(rename = "adapter:disconnected")]
    AdapterDisconnected { reason: String, at: u64 },

    #[serde(rename = "adapter:reconnect_scheduled")]
    AdapterReconnectScheduled {
        attempt: u32,
        delay_ms: u64,
        at: u64,
    },

    #[serde(rename = "adapter:spawn_requested")]
    AdapterSpawnRequested { entity_id: String, at: u64 },

    #[serde(rename = "adapter:friendly_fire")]
    FriendlyFire {
        source: String,
        target: String,
        at: u64,
    },

    /// Unrecognized event type, kept for forward compatibility.
    /// Never serialized back out (so round-tripping a known event never
    /// regresses to `Custom`); only produced when deserializing.
    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    /// The `category:action` tag this event serializes under, for
    /// subscription filters that match on event type without needing to
    /// round-trip through JSON.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::PersistenceSaved { .. } => "persistence:saved",
            Self::PersistenceLoadFailed { .. } => "persistence:load_failed",
            Self::PersistenceLoaded { .. } => "persistence:loaded",
            Self::OutcomeRecorded { .. } => "learning:outcome_recorded",
            Self::TaskCompleted { .. } => "learning:task_completed",
            Self::YieldRecorded { .. } => "learning:yield_recorded",
            Self::HazardEncountered { .. } => "learning:hazard_encountered",
            Self::BotCreated { .. } => "registry:bot_created",
            Self::BotUpdated { .. } => "registry:bot_updated",
            Self::BotSpawned { .. } => "supervisor:bot_spawned",
            Self::BotDespawned { .. } => "supervisor:bot_despawned",
            Self::SpawnRetryScheduled { .. } => "supervisor:spawn_retry_scheduled",
            Self::DeadLettered { .. } => "supervisor:dead_lettered",
            Self::DeadLetterDrained { .. } => "supervisor:dead_letter_drained",
            Self::MicrocoreMove { .. } => "microcore:move",
            Self::MicrocoreTaskComplete { .. } => "microcore:task_complete",
            Self::MicrocoreError { .. } => "microcore:error",
            Self::MicrocoreStatus { .. } => "microcore:status",
            Self::AdapterConnected { .. } => "adapter:connected",
            Self::AdapterDisconnected { .. } => "adapter:disconnected",
            Self::AdapterReconnectScheduled { .. } => "adapter:reconnect_scheduled",
            Self::AdapterSpawnRequested { .. } => "adapter:spawn_requested",
            Self::FriendlyFire { .. } => "adapter:friendly_fire",
            Self::Custom => "custom",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
