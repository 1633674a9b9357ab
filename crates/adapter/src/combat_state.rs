// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dedup, bounded/TTL-evicted history, and per-entity combat state —
//! exclusively owned and mutated by the feedback-handling path and the
//! adapter's cleanup timer.

use std::collections::{HashMap, VecDeque};

use fleet_core::combat::{normalize_entity_id, CombatEvent, CombatEventKind, CombatantState};

use crate::config::AdapterConfig;
use crate::feedback::ParsedFeedback;

/// Per-entity combat state, the dedup map, and the bounded event history.
pub struct CombatTracker {
    combatants: HashMap<String, CombatantState>,
    history: VecDeque<CombatEvent>,
    dedup: HashMap<String, u64>,
    friendlies: Vec<String>,
    damage_window_ms: u64,
}

/// Result of accepting a feedback line: the event, whether it was a
/// duplicate within the window, and whether it triggered friendly fire.
pub struct AcceptOutcome {
    pub event: Option<CombatEvent>,
    pub duplicate: bool,
    pub friendly_fire: bool,
}

impl CombatTracker {
    pub fn new(config: &AdapterConfig, friendlies: Vec<String>) -> Self {
        Self {
            combatants: HashMap::new(),
            history: VecDeque::new(),
            dedup: HashMap::new(),
            friendlies,
            damage_window_ms: config.damage_window.as_millis() as u64,
        }
    }

    pub fn combatant(&self, entity_id: &str) -> Option<&CombatantState> {
        self.combatants.get(&normalize_entity_id(entity_id))
    }

    pub fn snapshot(&self) -> HashMap<String, CombatantState> {
        self.combatants.clone()
    }

    fn entry(&mut self, entity_id: &str) -> &mut CombatantState {
        let key = normalize_entity_id(entity_id);
        self.combatants
            .entry(key.clone())
            .or_insert_with(|| CombatantState::new(key, self.damage_window_ms))
    }

    /// Apply one parsed feedback line: dedup, then if admitted, append to
    /// history and update combatant state.
    pub fn accept(&mut self, parsed: ParsedFeedback, config: &AdapterConfig) -> AcceptOutcome {
        let ParsedFeedback { event, explicit_health } = parsed;
        let key = event.dedup_key();
        let window_ms = config.dedup_window.as_millis() as u64;

        if let Some(&last) = self.dedup.get(&key) {
            if event.timestamp.saturating_sub(last) < window_ms {
                return AcceptOutcome {
                    event: None,
                    duplicate: true,
                    friendly_fire: false,
                };
            }
        }
        self.dedup.insert(key, event.timestamp);

        self.history.push_back(event.clone());
        while self.history.len() > config.history_capacity {
            self.history.pop_front();
        }

        let friendly_fire = self.update_combat_state(&event, explicit_health);

        AcceptOutcome {
            event: Some(event),
            duplicate: false,
            friendly_fire,
        }
    }

    fn update_combat_state(&mut self, event: &CombatEvent, explicit_health: Option<f64>) -> bool {
        match event.kind {
            CombatEventKind::Attack | CombatEventKind::Damage => {
                if let Some(target) = &event.target {
                    let amount = event.amount.unwrap_or(0.0);
                    let timestamp = event.timestamp;
                    let target_state = self.entry(target);
                    if let Some(health) = explicit_health {
                        target_state.health = health;
                        target_state.last_damage = Some(amount);
                        target_state.taken.record(timestamp, amount);
                        target_state.refresh_status();
                    } else {
                        target_state.apply_damage(amount, timestamp);
                    }
                    target_state.last_event = Some(event.clone());
                    target_state.last_action_at = timestamp;
                }
                if let Some(source) = &event.source {
                    let amount = event.amount.unwrap_or(0.0);
                    let timestamp = event.timestamp;
                    let source_state = self.entry(source);
                    source_state.dealt.record(timestamp, amount);
                    source_state.last_action_at = timestamp;
                    source_state.last_event = Some(event.clone());
                }
            }
            CombatEventKind::Health => {
                if let Some(target) = &event.target {
                    let health = explicit_health.or(event.amount).unwrap_or(0.0);
                    let timestamp = event.timestamp;
                    let target_state = self.entry(target);
                    target_state.health = health;
                    target_state.refresh_status();
                    target_state.last_action_at = timestamp;
                    target_state.last_event = Some(event.clone());
                }
            }
            CombatEventKind::Heal => {
                if let Some(target) = &event.target {
                    let amount = event.amount.unwrap_or(0.0);
                    let timestamp = event.timestamp;
                    let target_state = self.entry(target);
                    target_state.apply_heal(amount);
                    target_state.last_action_at = timestamp;
                    target_state.last_event = Some(event.clone());
                }
            }
            CombatEventKind::Dodge | CombatEventKind::Block | CombatEventKind::Parry => {
                if let Some(target) = &event.target {
                    let timestamp = event.timestamp;
                    let target_state = self.entry(target);
                    target_state.last_defensive_at = Some(timestamp);
                    target_state.last_event = Some(event.clone());
                }
                if let Some(source) = &event.source {
                    let target_label = event.target.clone();
                    let timestamp = event.timestamp;
                    let source_state = self.entry(source);
                    source_state.last_countered_by = target_label;
                    source_state.last_action_at = timestamp;
                }
            }
            CombatEventKind::Defeated => {
                if let Some(target) = &event.target {
                    let timestamp = event.timestamp;
                    let target_state = self.entry(target);
                    target_state.health = 0.0;
                    target_state.status = fleet_core::combat::CombatantStatus::Defeated;
                    target_state.last_action_at = timestamp;
                    target_state.last_event = Some(event.clone());
                }
            }
            CombatEventKind::Durability => {
                if let (Some(source), Some(item)) = (&event.source, &event.target) {
                    let amount = event.amount.unwrap_or(0.0);
                    let timestamp = event.timestamp;
                    let source_state = self.entry(source);
                    source_state.equipment_durability.insert(item.clone(), amount);
                    source_state.last_action_at = timestamp;
                }
            }
        }

        if let (Some(source), Some(target)) = (&event.source, &event.target) {
            fleet_core::combat::is_friendly(source, &self.friendlies)
                && fleet_core::combat::is_friendly(target, &self.friendlies)
        } else {
            false
        }
    }

    /// Evict combatants idle beyond `combatant_ttl`, and prune the event
    /// history and dedup map beyond their TTL/window.
    pub fn cleanup(&mut self, now_ms: u64, config: &AdapterConfig) {
        let combatant_ttl_ms = config.combatant_ttl.as_millis() as u64;
        self.combatants
            .retain(|_, state| now_ms.saturating_sub(state.last_action_at) <= combatant_ttl_ms);

        let history_ttl_ms = config.history_ttl.as_millis() as u64;
        self.history
            .retain(|event| now_ms.saturating_sub(event.timestamp) <= history_ttl_ms);

        let dedup_window_ms = config.dedup_window.as_millis() as u64;
        self.dedup
            .retain(|_, &mut last| now_ms.saturating_sub(last) <= dedup_window_ms);
    }

    pub fn history(&self) -> &VecDeque<CombatEvent> {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

#[cfg(test)]
#[path = "combat_state_tests.rs"]
mod tests;
