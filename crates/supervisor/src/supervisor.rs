// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bot lifecycle: spawn with retry and dead-lettering, batch and team
//! spawns, despawn/respawn, and recovery of dead-lettered spawns.

use std::path::PathBuf;
use std::sync::Arc;

use fleet_adapter::{GameServerAdapter, TransportConnector};
use fleet_core::{
    BotId, BotIdentity, BotRole, DeadLetterEntry, DeadLetterId, Event, PersonalityVector, Position,
};
use fleet_learning::LearningStore;
use fleet_microcore::MicrocoreManager;
use fleet_persistence::AtomicStore;
use fleet_registry::{BotRegistry, EnsureProfileOptions};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::config::SupervisorConfig;
use crate::error::SupervisorError;
use crate::team;

/// Inputs to [`BotSupervisor::spawn`].
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    pub name: Option<String>,
    pub role: BotRole,
    pub description: Option<String>,
    pub personality: Option<PersonalityVector>,
    pub world_entity_type: Option<String>,
    pub appearance: Option<String>,
    pub position: Position,
    pub post_spawn_commands: Vec<String>,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            name: None,
            role: BotRole::Miner,
            description: None,
            personality: None,
            world_entity_type: None,
            appearance: None,
            position: Position::default(),
            post_spawn_commands: Vec::new(),
        }
    }
}

/// Inputs to [`BotSupervisor::spawn_team`].
#[derive(Debug, Clone, Default)]
pub struct SpawnTeamOptions {
    pub position: Position,
    pub name_prefix: Option<String>,
}

/// Inputs to [`BotSupervisor::respawn`].
#[derive(Debug, Clone, Default)]
pub struct RespawnOptions {
    pub position: Position,
}

/// Result of one spawn attempt: either the bot came up, or retries were
/// exhausted and it was dead-lettered (the registry entry still exists).
#[derive(Debug, Clone)]
pub enum SpawnOutcome {
    Spawned(BotIdentity),
    DeadLettered(DeadLetterEntry),
}

impl SpawnOutcome {
    pub fn identity(&self) -> &BotIdentity {
        match self {
            Self::Spawned(identity) => identity,
            Self::DeadLettered(entry) => &entry.profile,
        }
    }
}

/// Partitioned results of draining the dead-letter queue.
#[derive(Debug, Clone, Default)]
pub struct DrainResult {
    pub successes: Vec<BotIdentity>,
    pub failures: Vec<DeadLetterEntry>,
}

fn validate_role(role: &BotRole) -> Result<(), SupervisorError> {
    if let BotRole::Custom(name) = role {
        if name.trim().is_empty() {
            return Err(SupervisorError::Validation("custom role name must not be empty".to_string()));
        }
    }
    Ok(())
}

fn default_name(role: &BotRole) -> String {
    format!("{role}")
}

/// Composes the registry, learning store, game-server adapter, and
/// microcore scheduler into the spawn/despawn/retry lifecycle.
pub struct BotSupervisor<Conn, C>
where
    Conn: TransportConnector + Send + Sync + 'static,
    C: fleet_core::Clock,
{
    registry: Arc<BotRegistry<C>>,
    learning: Arc<LearningStore<C>>,
    adapter: GameServerAdapter<Conn, C>,
    microcore: Arc<MicrocoreManager<GameServerAdapter<Conn, C>, C>>,
    clock: C,
    config: SupervisorConfig,
    dead_letters: Mutex<Vec<DeadLetterEntry>>,
    dead_letter_store: AtomicStore<Vec<DeadLetterEntry>, C>,
    events: broadcast::Sender<Event>,
}

impl<Conn, C> BotSupervisor<Conn, C>
where
    Conn: TransportConnector + Send + Sync + 'static,
    C: fleet_core::Clock,
{
    pub async fn open(
        dead_letter_path: impl Into<PathBuf>,
        registry: Arc<BotRegistry<C>>,
        learning: Arc<LearningStore<C>>,
        adapter: GameServerAdapter<Conn, C>,
        microcore: Arc<MicrocoreManager<GameServerAdapter<Conn, C>, C>>,
        clock: C,
        config: SupervisorConfig,
    ) -> Result<Self, SupervisorError> {
        let dead_letter_store = AtomicStore::new(dead_letter_path, clock.clone());
        let dead_letters = dead_letter_store.load().await?;
        let (events, _) = broadcast::channel(256);
        Ok(Self {
            registry,
            learning,
            adapter,
            microcore,
            clock,
            config,
            dead_letters: Mutex::new(dead_letters),
            dead_letter_store,
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    fn emit(&self, event: Event) {
        self.events.send(event).ok();
    }

    pub fn dead_letter_queue(&self) -> Vec<DeadLetterEntry> {
        self.dead_letters.lock().clone()
    }

    /// Validate, resolve or create the registry profile, merge in the
    /// learning profile if one exists, then attempt a game-server spawn
    /// with retry. Exhausting retries dead-letters the profile but still
    /// returns `Ok` (the registry entry is kept).
    pub async fn spawn(&self, options: SpawnOptions) -> Result<SpawnOutcome, SupervisorError> {
        validate_role(&options.role)?;
        self.registry.check_spawn_limit(1, self.config.max_active)?;

        let ensure = EnsureProfileOptions {
            name: options.name.clone().unwrap_or_else(|| default_name(&options.role)),
            role: options.role.clone(),
            world_entity_type: options.world_entity_type.clone().unwrap_or_else(|| "villager".to_string()),
            personality: options.personality,
            appearance: options.appearance.clone().unwrap_or_else(|| "default".to_string()),
            spawn_position: options.position,
            description: options.description.clone().unwrap_or_default(),
        };
        let mut identity = self.registry.ensure_profile(ensure);

        if let Some(profile) = self.learning.profile(&identity.name) {
            self.registry.merge_learning_profile(&identity.id, &profile)?;
            if let Some(refreshed) = self.registry.get(&identity.id) {
                identity = refreshed;
            }
        }

        self.spawn_with_retry(identity, options.position, options.post_spawn_commands, 0).await
    }

    async fn spawn_with_retry(
        &self,
        identity: BotIdentity,
        position: Position,
        post_spawn_commands: Vec<String>,
        prior_fail_count: u32,
    ) -> Result<SpawnOutcome, SupervisorError> {
        let mut last_error = String::new();
        for attempt in 1..=self.config.max_retries {
            match self.adapter.spawn_entity(identity.id.as_str(), position, post_spawn_commands.clone()).await {
                Ok(()) => {
                    self.registry.record_spawn(&identity.id, position, true)?;
                    self.microcore.start(identity.id, position);
                    self.emit(Event::BotSpawned { id: identity.id, position, at: self.clock.epoch_ms() });
                    let spawned = self.registry.get(&identity.id).unwrap_or(identity);
                    return Ok(SpawnOutcome::Spawned(spawned));
                }
                Err(err) => {
                    last_error = err.to_string();
                    if attempt < self.config.max_retries {
                        self.emit(Event::SpawnRetryScheduled { id: identity.id, attempt, at: self.clock.epoch_ms() });
                        tokio::time::sleep(self.config.retry_delay_for(attempt)).await;
                    }
                }
            }
        }
        let entry = self.dead_letter(identity, position, last_error, prior_fail_count);
        Ok(SpawnOutcome::DeadLettered(entry))
    }

    fn dead_letter(
        &self,
        profile: BotIdentity,
        position: Position,
        last_error: String,
        prior_fail_count: u32,
    ) -> DeadLetterEntry {
        let at = self.clock.epoch_ms();
        let entry = DeadLetterEntry {
            id: DeadLetterId::new(),
            profile,
            intended_position: position,
            last_error,
            fail_count: prior_fail_count + 1,
            timestamp: at,
        };
        let mut guard = self.dead_letters.lock();
        guard.push(entry.clone());
        self.dead_letter_store.schedule_save(guard.clone());
        drop(guard);
        self.emit(Event::DeadLettered { id: entry.profile.id, fail_count: entry.fail_count, at });
        entry
    }

    /// Drain the dead-letter queue into fresh spawn attempts, partitioning
    /// results into successes and entries that failed again.
    pub async fn retry_dead_letter_queue(&self) -> Result<DrainResult, SupervisorError> {
        let entries = std::mem::take(&mut *self.dead_letters.lock());
        self.dead_letter_store.schedule_save(Vec::new());

        let mut result = DrainResult::default();
        for entry in entries {
            let fail_count = entry.fail_count;
            match self
                .spawn_with_retry(entry.profile, entry.intended_position, Vec::new(), fail_count)
                .await?
            {
                SpawnOutcome::Spawned(identity) => result.successes.push(identity),
                SpawnOutcome::DeadLettered(entry) => result.failures.push(entry),
            }
        }

        self.emit(Event::DeadLetterDrained {
            successes: result.successes.len() as u32,
            failures: result.failures.len() as u32,
            at: self.clock.epoch_ms(),
        });
        Ok(result)
    }

    /// Spawn every entry in `list` sequentially, pre-checking the
    /// aggregate against the spawn limit.
    pub async fn spawn_batch(&self, list: Vec<SpawnOptions>) -> Result<Vec<SpawnOutcome>, SupervisorError> {
        self.registry.check_spawn_limit(list.len(), self.config.max_active)?;
        let mut outcomes = Vec::with_capacity(list.len());
        for options in list {
            outcomes.push(self.spawn(options).await?);
        }
        Ok(outcomes)
    }

    /// Expand a named team preset (mining/building/exploration/combat/
    /// farming/balanced) into a batch of spawns.
    pub async fn spawn_team(
        &self,
        preset: &str,
        options: SpawnTeamOptions,
    ) -> Result<Vec<SpawnOutcome>, SupervisorError> {
        let members = team::resolve_preset(preset)?;
        let prefix = options.name_prefix.unwrap_or_else(|| preset.to_string());
        let mut list = Vec::new();
        for member in members {
            for index in 0..member.count {
                list.push(SpawnOptions {
                    name: Some(format!("{prefix}-{}-{index}", member.role)),
                    role: member.role.clone(),
                    position: options.position,
                    ..SpawnOptions::default()
                });
            }
        }
        self.spawn_batch(list).await
    }

    pub async fn despawn(&self, id: &BotId) -> Result<(), SupervisorError> {
        let identity = self.registry.get(id).ok_or(SupervisorError::NotFound(*id))?;
        self.microcore.stop(id);
        self.registry.record_despawn(id, identity.last_known_position)?;
        self.emit(Event::BotDespawned { id: *id, at: self.clock.epoch_ms() });
        Ok(())
    }

    pub async fn respawn(&self, id: &BotId, options: RespawnOptions) -> Result<SpawnOutcome, SupervisorError> {
        let identity = self.registry.get(id).ok_or(SupervisorError::NotFound(*id))?;
        self.spawn_with_retry(identity, options.position, Vec::new(), 0).await
    }

    /// Spawn every registry entry that is not already active.
    pub async fn spawn_all_known(&self) -> Result<Vec<SpawnOutcome>, SupervisorError> {
        let candidates: Vec<BotIdentity> = self
            .registry
            .get_all()
            .into_iter()
            .filter(|b| b.status != fleet_core::BotStatus::Active)
            .collect();
        self.registry.check_spawn_limit(candidates.len(), self.config.max_active)?;
        let mut outcomes = Vec::with_capacity(candidates.len());
        for identity in candidates {
            let position = identity.last_known_position;
            outcomes.push(self.spawn_with_retry(identity, position, Vec::new(), 0).await?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
