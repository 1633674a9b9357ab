// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::path::Path;

use fleet_core::{Clock, Event, LearningProfile, OutcomeId, OutcomeRecord};
use fleet_persistence::{AtomicStore, PersistenceError};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::document::KnowledgeDocument;

/// Outcomes older than this are dropped on load/prune.
pub const OUTCOME_RETENTION_MS: u64 = 90 * 24 * 60 * 60 * 1000;

/// Default cap on total retained outcomes, keeping the newest.
pub const DEFAULT_OUTCOME_CAP: usize = 50_000;

#[derive(Debug, Error)]
pub enum LearningError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

struct Inner {
    profiles: HashMap<String, LearningProfile>,
    outcomes: Vec<OutcomeRecord>,
}

/// Debounced, atomically-persisted store for per-bot learning profiles
/// and the outcome history aggregates are derived from.
pub struct LearningStore<C: Clock> {
    clock: C,
    profiles_store: AtomicStore<HashMap<String, LearningProfile>, C>,
    knowledge_store: AtomicStore<KnowledgeDocument, C>,
    outcome_cap: usize,
    inner: Mutex<Inner>,
    events: broadcast::Sender<Event>,
}

impl<C: Clock> LearningStore<C> {
    pub async fn open(
        profiles_path: impl Into<std::path::PathBuf>,
        knowledge_path: impl Into<std::path::PathBuf>,
        clock: C,
    ) -> Result<Self, LearningError> {
        let profiles_store = AtomicStore::new(profiles_path, clock.clone());
        let knowledge_store = AtomicStore::new(knowledge_path, clock.clone());

        let profiles = profiles_store.load().await?;
        let mut knowledge = knowledge_store.load().await?;
        prune_outcomes(&mut knowledge.outcomes, DEFAULT_OUTCOME_CAP, clock.epoch_ms());

        let (events, _) = broadcast::channel(256);

        Ok(Self {
            clock,
            profiles_store,
            knowledge_store,
            outcome_cap: DEFAULT_OUTCOME_CAP,
            inner: Mutex::new(Inner {
                profiles,
                outcomes: knowledge.outcomes,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }

    /// Record a task outcome: appends it, updates the bot's per-skill
    /// counters and running means, recomputes aggregates, prunes to the
    /// retention cap, and schedules both files to be saved.
    pub fn record_outcome(
        &self,
        npc: &str,
        task: &str,
        success: bool,
        yield_amount: f64,
        duration_ms: u64,
        hazards: Vec<String>,
        environment_tag: impl Into<String>,
    ) -> OutcomeId {
        let at = self.clock.epoch_ms();
        let record = OutcomeRecord::builder()
            .task_type(task)
            .npc_id(npc)
            .environment_tag(environment_tag)
            .success(success)
            .yield_amount(yield_amount)
            .duration_ms(duration_ms)
            .hazards(hazards.clone())
            .timestamp(at)
            .build();
        let id = record.id;

        {
            let mut inner = self.inner.lock();
            inner.outcomes.push(record);
            prune_outcomes(&mut inner.outcomes, self.outcome_cap, at);

            let profile = inner
                .profiles
                .entry(npc.to_string())
                .or_insert_with(|| LearningProfile::new(npc));
            let perf = profile.performance.entry(task.to_string()).or_default();
            let efficiency = if duration_ms == 0 {
                0.0
            } else {
                (yield_amount / duration_ms as f64).max(0.0)
            };
            let reward = if success { 1.0 } else { 0.0 };
            perf.record(success, duration_ms as f64, efficiency, reward);
            profile.apply_outcome(success, efficiency);
            profile.recompute_aggregates();
            profile.last_task = Some(task.to_string());
            profile.updated_at = at;

            self.profiles_store
                .schedule_save(inner.profiles.clone());
            self.knowledge_store.schedule_save(KnowledgeDocument {
                version: 1,
                outcomes: inner.outcomes.clone(),
                last_updated: at,
            });
        }

        self.emit(Event::OutcomeRecorded {
            npc: npc.to_string(),
            task: task.to_string(),
            success,
            at,
        });
        if success {
            self.emit(Event::TaskCompleted {
                npc: npc.to_string(),
                task: task.to_string(),
                at,
            });
        }
        if yield_amount > 0.0 {
            self.emit(Event::YieldRecorded {
                npc: npc.to_string(),
                task: task.to_string(),
                amount: yield_amount,
                at,
            });
        }
        for hazard in hazards {
            self.emit(Event::HazardEncountered {
                npc: npc.to_string(),
                hazard,
                at,
            });
        }

        id
    }

    /// Clamp each skill to `[0, 100]` and merge into the bot's profile.
    pub fn update_skills(&self, npc: &str, skills: impl IntoIterator<Item = (String, f64)>) {
        let at = self.clock.epoch_ms();
        let mut inner = self.inner.lock();
        let profile = inner
            .profiles
            .entry(npc.to_string())
            .or_insert_with(|| LearningProfile::new(npc));
        profile.update_skills(skills);
        profile.updated_at = at;
        self.profiles_store.schedule_save(inner.profiles.clone());
    }

    /// `successes / attempts` for a task across all bots, or 0 with no attempts.
    pub fn success_rate(&self, task: &str) -> f64 {
        let inner = self.inner.lock();
        let (attempts, successes) = inner
            .outcomes
            .iter()
            .filter(|o| o.task_type == task)
            .fold((0u64, 0u64), |(a, s), o| (a + 1, s + o.success as u64));
        if attempts == 0 {
            0.0
        } else {
            successes as f64 / attempts as f64
        }
    }

    /// Mean yield for a task across all recorded outcomes.
    pub fn average_yield(&self, task: &str) -> f64 {
        let inner = self.inner.lock();
        let matching: Vec<f64> = inner
            .outcomes
            .iter()
            .filter(|o| o.task_type == task)
            .map(|o| o.yield_amount)
            .collect();
        if matching.is_empty() {
            0.0
        } else {
            matching.iter().sum::<f64>() / matching.len() as f64
        }
    }

    /// Fraction of outcomes across all tasks that encountered `hazard`.
    pub fn hazard_frequency(&self, hazard: &str) -> f64 {
        let inner = self.inner.lock();
        if inner.outcomes.is_empty() {
            return 0.0;
        }
        let count = inner
            .outcomes
            .iter()
            .filter(|o| o.hazards.iter().any(|h| h == hazard))
            .count();
        count as f64 / inner.outcomes.len() as f64
    }

    /// The most recent `limit` outcomes for `task`, newest first.
    pub fn task_history(&self, task: &str, limit: usize) -> Vec<OutcomeRecord> {
        let inner = self.inner.lock();
        let mut matching: Vec<OutcomeRecord> = inner
            .outcomes
            .iter()
            .filter(|o| o.task_type == task)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        matching
    }

    /// `round(baseMs * (mod - yieldBonus))` where `mod = max(0.5, 1.3 -
    /// successRate)` and `yieldBonus = min(0.9, avgYield / 200)`.
    pub fn dynamic_duration_estimate(&self, task: &str, base_ms: f64) -> f64 {
        let success_rate = self.success_rate(task);
        let avg_yield = self.average_yield(task);
        let modifier = (1.3 - success_rate).max(0.5);
        let yield_bonus = (avg_yield / 200.0).min(0.9);
        (base_ms * (modifier - yield_bonus)).round()
    }

    /// Top-five hazards by frequency across the most recent 50 records of `task`.
    pub fn recommended_supplies(&self, task: &str) -> Vec<String> {
        let recent = self.task_history(task, 50);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for record in &recent {
            for hazard in &record.hazards {
                *counts.entry(hazard.clone()).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<(String, u32)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.into_iter().take(5).map(|(hazard, _)| hazard).collect()
    }

    /// Force an immediate flush of both backing files, bypassing the debounce.
    pub async fn flush(&self) -> Result<(), LearningError> {
        self.profiles_store.flush().await?;
        self.knowledge_store.flush().await?;
        Ok(())
    }

    pub fn profile(&self, npc: &str) -> Option<LearningProfile> {
        self.inner.lock().profiles.get(npc).cloned()
    }
}

fn prune_outcomes(outcomes: &mut Vec<OutcomeRecord>, cap: usize, now: u64) {
    outcomes.retain(|o| now.saturating_sub(o.timestamp) <= OUTCOME_RETENTION_MS);
    if outcomes.len() > cap {
        outcomes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        let excess = outcomes.len() - cap;
        outcomes.drain(0..excess);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
