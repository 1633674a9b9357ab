// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Combat events and per-entity combatant state, shared between the
//! adapter (which owns them), persistence (which snapshots them), and the
//! event bus (which broadcasts them).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Kind of combat event recognized by the feedback parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatEventKind {
    Attack,
    Dodge,
    Block,
    Parry,
    Damage,
    Health,
    Defeated,
    Heal,
    Durability,
}

crate::simple_display! {
    CombatEventKind {
        Attack => "attack",
        Dodge => "dodge",
        Block => "block",
        Parry => "parry",
        Damage => "damage",
        Health => "health",
        Defeated => "defeated",
        Heal => "heal",
        Durability => "durability",
    }
}

/// An immutable combat event, as produced by the feedback parser.
///
/// `dedup_key()` implements the `type|source|target|raw` suppression key
/// used to collapse repeated feedback lines within the dedup window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    #[serde(rename = "type")]
    pub kind: CombatEventKind,
    pub source: Option<String>,
    pub target: Option<String>,
    pub amount: Option<f64>,
    #[serde(default)]
    pub critical: bool,
    pub raw_line: String,
    pub timestamp: u64,
}

impl CombatEvent {
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.kind,
            self.source.as_deref().unwrap_or(""),
            self.target.as_deref().unwrap_or(""),
            self.raw_line
        )
    }
}

crate::builder! {
    pub struct CombatEventBuilder => CombatEvent {
        into {
            raw_line: String = "",
        }
        set {
            kind: CombatEventKind = CombatEventKind::Attack,
            source: Option<String> = None,
            target: Option<String> = None,
            amount: Option<f64> = None,
            critical: bool = false,
            timestamp: u64 = 0,
        }
    }
}

/// Lifecycle status of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantStatus {
    Active,
    Down,
    Defeated,
}

/// Fraction of `maxHealth` at or below which a combatant is staggered
/// (`down`) rather than merely damaged, while still above zero.
const DOWN_HEALTH_RATIO: f64 = 0.2;

/// Absolute health at or below which a combatant is `down`, used when
/// `maxHealth` hasn't been observed yet and the ratio can't be computed.
const DOWN_HEALTH_ABSOLUTE: f64 = 5.0;

crate::simple_display! {
    CombatantStatus {
        Active => "active",
        Down => "down",
        Defeated => "defeated",
    }
}

/// Fixed-width rolling window for derived damage-per-second metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageWindow {
    #[serde(skip)]
    samples: VecDeque<(u64, f64)>,
    pub window_ms: u64,
}

impl DamageWindow {
    pub fn new(window_ms: u64) -> Self {
        Self {
            samples: VecDeque::new(),
            window_ms,
        }
    }

    /// Record a sample at `timestamp`, evicting samples older than the window.
    pub fn record(&mut self, timestamp: u64, amount: f64) {
        self.samples.push_back((timestamp, amount));
        self.evict(timestamp);
    }

    fn evict(&mut self, now: u64) {
        while let Some(&(ts, _)) = self.samples.front() {
            if now.saturating_sub(ts) > self.window_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// `(dps, average, sample_count)` over the current window.
    pub fn stats(&self) -> (f64, f64, usize) {
        let count = self.samples.len();
        if count == 0 {
            return (0.0, 0.0, 0);
        }
        let total: f64 = self.samples.iter().map(|(_, a)| a).sum();
        let avg = total / count as f64;
        let dps = if self.window_ms == 0 {
            0.0
        } else {
            total / (self.window_ms as f64 / 1000.0)
        };
        (dps, avg, count)
    }
}

/// Per-entity combat state, owned exclusively by the adapter.
///
/// TTL-evicted when idle beyond the configured `combatantTtl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantState {
    pub entity_id: String,
    pub health: f64,
    pub max_health: Option<f64>,
    pub status: CombatantStatus,
    pub last_damage: Option<f64>,
    pub dealt: DamageWindow,
    pub taken: DamageWindow,
    pub last_event: Option<CombatEvent>,
    pub last_action_at: u64,
    pub last_defensive_at: Option<u64>,
    pub last_countered_by: Option<String>,
    pub equipment_durability: std::collections::HashMap<String, f64>,
}

impl CombatantState {
    pub fn new(entity_id: impl Into<String>, window_ms: u64) -> Self {
        Self {
            entity_id: entity_id.into(),
            health: 0.0,
            max_health: None,
            status: CombatantStatus::Active,
            last_damage: None,
            dealt: DamageWindow::new(window_ms),
            taken: DamageWindow::new(window_ms),
            last_event: None,
            last_action_at: 0,
            last_defensive_at: None,
            last_countered_by: None,
            equipment_durability: std::collections::HashMap::new(),
        }
    }

    /// Apply damage, clamping health at zero and updating status.
    pub fn apply_damage(&mut self, amount: f64, timestamp: u64) {
        self.health = (self.health - amount).max(0.0);
        self.last_damage = Some(amount);
        self.taken.record(timestamp, amount);
        self.refresh_status();
    }

    /// Heal, clamping to `max_health` when known.
    pub fn apply_heal(&mut self, amount: f64) {
        self.health += amount;
        if let Some(max) = self.max_health {
            self.health = self.health.min(max);
        }
        self.refresh_status();
    }

    /// Recompute `status` from the current `health`/`maxHealth`. Callers
    /// that set `health` directly (an explicit health reading from
    /// feedback) must call this afterward to keep status consistent.
    ///
    /// `down` applies when health is above zero and either at or below
    /// [`DOWN_HEALTH_ABSOLUTE`], or at or below [`DOWN_HEALTH_RATIO`] of a
    /// known `maxHealth`.
    pub fn refresh_status(&mut self) {
        let ratio_down = self.max_health.is_some_and(|max| max > 0.0 && self.health / max <= DOWN_HEALTH_RATIO);
        self.status = if self.health <= 0.0 {
            CombatantStatus::Defeated
        } else if self.health <= DOWN_HEALTH_ABSOLUTE || ratio_down {
            CombatantStatus::Down
        } else {
            CombatantStatus::Active
        };
    }
}

/// Normalize a raw feedback entity id: lowercase, then strip any character
/// outside `[a-z0-9_:-]` so parsed ids can never be re-injected into a
/// subsequent command string.
pub fn normalize_entity_id(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | ':' | '-'))
        .collect()
}

/// An entity is "friendly" if explicitly listed, or its normalized id
/// begins with `npc` or `ally`.
pub fn is_friendly(entity_id: &str, explicit_friendlies: &[String]) -> bool {
    let normalized = normalize_entity_id(entity_id);
    explicit_friendlies.iter().any(|f| f == &normalized)
        || normalized.starts_with("npc")
        || normalized.starts_with("ally")
}

#[cfg(test)]
#[path = "combat_tests.rs"]
mod tests;
