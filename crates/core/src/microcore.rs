// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory per-bot microcore state and the inbox/status types that
//! cross the boundary between a bot's tick task and its callers.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::bot::{BotId, BotStatus, Position};

/// Bounded FIFO of the most-recent memory strings for a bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedMemory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl BoundedMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for BoundedMemory {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Current phase number, clamped to `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase(u8);

impl Phase {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 6))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self(1)
    }
}

/// The kind-specific payload of an inbox event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboxEventKind {
    MoveTo { target: Position },
    Task { name: String },
    Scan,
    PhaseUpdate { phase: u8 },
}

/// A message delivered to a bot's inbox, processed in FIFO order at the
/// start of every tick. Any event carrying `memory` is appended to the
/// bounded memory FIFO regardless of its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxEvent {
    #[serde(flatten)]
    pub kind: InboxEventKind,
    pub memory: Option<String>,
}

impl InboxEvent {
    pub fn move_to(target: Position) -> Self {
        Self {
            kind: InboxEventKind::MoveTo { target },
            memory: None,
        }
    }

    pub fn task(name: impl Into<String>, memory_hint: Option<String>) -> Self {
        Self {
            kind: InboxEventKind::Task { name: name.into() },
            memory: memory_hint,
        }
    }

    pub fn scan() -> Self {
        Self {
            kind: InboxEventKind::Scan,
            memory: None,
        }
    }

    pub fn phase_update(phase: u8, memory_hint: Option<String>) -> Self {
        Self {
            kind: InboxEventKind::PhaseUpdate { phase },
            memory: memory_hint,
        }
    }
}

/// In-memory per-bot tick state, owned exclusively by that bot's tick task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicrocoreState {
    pub bot_id: BotId,
    pub position: Position,
    pub velocity: Position,
    pub target: Option<Position>,
    pub tick_count: u64,
    pub last_scan_at: Option<u64>,
    pub last_scan_result: Option<String>,
    pub memory: BoundedMemory,
    pub current_task: Option<String>,
    pub autonomy_enabled: bool,
    pub phase: Phase,
}

impl MicrocoreState {
    pub fn new(bot_id: BotId, position: Position) -> Self {
        Self {
            bot_id,
            position,
            velocity: Position::default(),
            target: None,
            tick_count: 0,
            last_scan_at: None,
            last_scan_result: None,
            memory: BoundedMemory::default(),
            current_task: None,
            autonomy_enabled: false,
            phase: Phase::default(),
        }
    }
}

/// A by-value snapshot published after every tick. Consumers must not
/// retain references into a bot's live state; this is the only thing
/// they ever see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub bot_id: BotId,
    pub reason: String,
    pub tick_count: u64,
    pub position: Position,
    pub velocity: Position,
    pub current_task: Option<String>,
    pub status: BotStatus,
    pub memory: Vec<String>,
    pub last_scan: Option<String>,
    pub last_tick_at: u64,
}

#[cfg(test)]
#[path = "microcore_tests.rs"]
mod tests;
