// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::path::PathBuf;

use fleet_core::{
    BotId, BotIdentity, BotRole, BotStatus, Clock, Event, LearningProfile, PersonalityVector,
    Position,
};
use fleet_persistence::{AtomicStore, PersistenceError};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::document::RegistryDocument;
use crate::id_gen::{format_candidate, sanitize_base};

/// Default spawn-limit cap on `count(status == active)`.
pub const DEFAULT_MAX_ACTIVE: usize = 8;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("unknown bot id {0}")]
    NotFound(BotId),

    #[error("cannot spawn {requested} bot(s): would exceed maximum of {max} bots")]
    SpawnLimitExceeded { requested: usize, max: usize },
}

/// Inputs to [`BotRegistry::ensure_profile`].
#[derive(Debug, Clone)]
pub struct EnsureProfileOptions {
    pub name: String,
    pub role: BotRole,
    pub world_entity_type: String,
    pub personality: Option<PersonalityVector>,
    pub appearance: String,
    pub spawn_position: Position,
    pub description: String,
}

impl Default for EnsureProfileOptions {
    fn default() -> Self {
        Self {
            name: "bot".to_string(),
            role: BotRole::Miner,
            world_entity_type: "villager".to_string(),
            personality: None,
            appearance: "default".to_string(),
            spawn_position: Position::default(),
            description: String::new(),
        }
    }
}

struct Inner {
    by_id: HashMap<BotId, BotIdentity>,
    name_to_id: HashMap<String, BotId>,
    role_to_ids: HashMap<String, Vec<BotId>>,
    next_counter: HashMap<String, u32>,
}

/// Identity, role, personality, and spawn status for every known bot,
/// indexed by id, name, and role.
///
/// All mutating operations schedule a debounced save through a single
/// [`fleet_persistence::AtomicStore`], so concurrent mutations never
/// interleave writes.
pub struct BotRegistry<C: Clock> {
    clock: C,
    store: AtomicStore<RegistryDocument, C>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<Event>,
}

impl<C: Clock> BotRegistry<C> {
    pub async fn open(path: impl Into<PathBuf>, clock: C) -> Result<Self, RegistryError> {
        let store = AtomicStore::new(path, clock.clone());
        let document = store.load().await?;

        let mut by_id = HashMap::new();
        let mut name_to_id = HashMap::new();
        let mut role_to_ids: HashMap<String, Vec<BotId>> = HashMap::new();
        for entry in document.npcs {
            name_to_id.insert(entry.name.clone(), entry.id);
            role_to_ids.entry(entry.role.to_string()).or_default().push(entry.id);
            by_id.insert(entry.id, entry);
        }

        let (events, _) = broadcast::channel(256);

        Ok(Self {
            clock,
            store,
            inner: Mutex::new(Inner {
                by_id,
                name_to_id,
                role_to_ids,
                next_counter: HashMap::new(),
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    fn save_locked(&self, inner: &Inner) {
        let document = RegistryDocument {
            version: 1,
            updated_at: self.clock.epoch_ms(),
            npcs: inner.by_id.values().cloned().collect(),
        };
        self.store.schedule_save(document);
    }

    /// Materialize a profile for `options.name`, returning the existing
    /// entry if one with that exact name is already registered.
    pub fn ensure_profile(&self, options: EnsureProfileOptions) -> BotIdentity {
        let at = self.clock.epoch_ms();
        let mut inner = self.inner.lock();

        if let Some(id) = inner.name_to_id.get(&options.name).copied() {
            if let Some(existing) = inner.by_id.get(&id) {
                return existing.clone();
            }
        }

        let base = sanitize_base(&options.name);
        let counter = inner.next_counter.entry(base.clone()).or_insert(0);
        let mut candidate = format_candidate(&base, *counter);
        while inner.by_id.contains_key(candidate.as_str()) {
            *counter += 1;
            candidate = format_candidate(&base, *counter);
        }
        *counter += 1;

        let personality = options.personality.unwrap_or_else(PersonalityVector::balanced);
        let mut identity = BotIdentity {
            id: BotId::from_string(candidate),
            name: options.name.clone(),
            role: options.role,
            world_entity_type: options.world_entity_type,
            personality,
            personality_bundle: personality.bundle(),
            appearance: options.appearance,
            spawn_position: options.spawn_position,
            last_known_position: options.spawn_position,
            description: options.description,
            status: BotStatus::Idle,
            spawn_count: 0,
            created_at: at,
            updated_at: at,
            last_spawned_at: None,
            last_despawned_at: None,
            notes: Vec::new(),
            tags: Vec::new(),
        };
        identity.refresh_bundle();

        inner.name_to_id.insert(identity.name.clone(), identity.id);
        inner
            .role_to_ids
            .entry(identity.role.to_string())
            .or_default()
            .push(identity.id);
        inner.by_id.insert(identity.id, identity.clone());
        self.save_locked(&inner);
        drop(inner);

        self.events.send(Event::BotCreated { id: identity.id, at }).ok();
        identity
    }

    /// Insert or replace an entry wholesale, recomputing its personality bundle.
    pub fn upsert(&self, mut identity: BotIdentity) {
        identity.refresh_bundle();
        identity.updated_at = self.clock.epoch_ms();
        let mut inner = self.inner.lock();
        inner.name_to_id.insert(identity.name.clone(), identity.id);
        inner
            .role_to_ids
            .entry(identity.role.to_string())
            .or_default()
            .push(identity.id);
        let id = identity.id;
        inner.by_id.insert(id, identity);
        self.save_locked(&inner);
        drop(inner);
        self.events.send(Event::BotUpdated { id, at: self.clock.epoch_ms() }).ok();
    }

    /// Record a spawn: updates status to active, last-known position, and
    /// optionally increments `spawn_count`.
    pub fn record_spawn(
        &self,
        id: &BotId,
        position: Position,
        increment: bool,
    ) -> Result<(), RegistryError> {
        let at = self.clock.epoch_ms();
        let mut inner = self.inner.lock();
        let entry = inner.by_id.get_mut(id).ok_or_else(|| RegistryError::NotFound(*id))?;
        entry.status = BotStatus::Active;
        entry.last_known_position = position;
        entry.last_spawned_at = Some(at);
        entry.updated_at = at;
        if increment {
            entry.spawn_count += 1;
        }
        self.save_locked(&inner);
        Ok(())
    }

    /// Record a despawn: marks the entry inactive and updates last-known position.
    pub fn record_despawn(&self, id: &BotId, position: Position) -> Result<(), RegistryError> {
        let at = self.clock.epoch_ms();
        let mut inner = self.inner.lock();
        let entry = inner.by_id.get_mut(id).ok_or_else(|| RegistryError::NotFound(*id))?;
        entry.status = BotStatus::Inactive;
        entry.last_known_position = position;
        entry.last_despawned_at = Some(at);
        entry.updated_at = at;
        self.save_locked(&inner);
        Ok(())
    }

    pub fn mark_inactive(&self, id: &BotId) -> Result<(), RegistryError> {
        let at = self.clock.epoch_ms();
        let mut inner = self.inner.lock();
        let entry = inner.by_id.get_mut(id).ok_or_else(|| RegistryError::NotFound(*id))?;
        entry.status = BotStatus::Inactive;
        entry.updated_at = at;
        self.save_locked(&inner);
        Ok(())
    }

    pub fn list_active(&self) -> Vec<BotIdentity> {
        self.list_by_status(BotStatus::Active)
    }

    pub fn list_by_status(&self, status: BotStatus) -> Vec<BotIdentity> {
        self.inner
            .lock()
            .by_id
            .values()
            .filter(|b| b.status == status)
            .cloned()
            .collect()
    }

    pub fn list_by_role(&self, role: &str) -> Vec<BotIdentity> {
        let inner = self.inner.lock();
        inner
            .role_to_ids
            .get(role)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }

    pub fn get(&self, id: &BotId) -> Option<BotIdentity> {
        self.inner.lock().by_id.get(id).cloned()
    }

    pub fn get_all(&self) -> Vec<BotIdentity> {
        self.inner.lock().by_id.values().cloned().collect()
    }

    /// Count of bots currently `active`, for the supervisor's spawn-limit pre-check.
    pub fn active_count(&self) -> usize {
        self.inner
            .lock()
            .by_id
            .values()
            .filter(|b| b.status == BotStatus::Active)
            .count()
    }

    /// Error if admitting `requested` more active bots would exceed `max`.
    pub fn check_spawn_limit(&self, requested: usize, max: usize) -> Result<(), RegistryError> {
        if self.active_count() + requested > max {
            return Err(RegistryError::SpawnLimitExceeded { requested, max });
        }
        Ok(())
    }

    /// Re-enrich a bot's metadata notes with a summary of its learning
    /// profile (skill count and xp), without altering its identity fields.
    pub fn merge_learning_profile(
        &self,
        id: &BotId,
        learning: &LearningProfile,
    ) -> Result<(), RegistryError> {
        let at = self.clock.epoch_ms();
        let mut inner = self.inner.lock();
        let entry = inner.by_id.get_mut(id).ok_or_else(|| RegistryError::NotFound(*id))?;
        entry.notes.retain(|n| !n.starts_with("learning:"));
        entry.notes.push(format!(
            "learning:skills={} xp={}",
            learning.skills.len(),
            learning.xp
        ));
        entry.updated_at = at;
        self.save_locked(&inner);
        Ok(())
    }

    pub async fn flush(&self) -> Result<(), RegistryError> {
        self.store.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
