// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The game-server adapter: owns the connection lifecycle, the rate-limited
//! command queue, feedback parsing, and combat-state maintenance, and
//! exposes the external interface the supervisor and microcore drive.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fleet_core::bot::{BotId, Position};
use fleet_core::combat::CombatantState;
use fleet_core::{Clock, Event};
use fleet_persistence::AtomicStore;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use crate::combat_state::CombatTracker;
use crate::command_queue::{enqueue, send_with_timeout, CommandQueue};
use crate::config::AdapterConfig;
use crate::connection::ConnectionState;
use crate::error::AdapterError;
use crate::feedback;
use crate::transport::{Transport, TransportConnector};

/// Point-in-time counters surfaced to operators and the supervisor.
#[derive(Debug, Clone, Default)]
pub struct AdapterMetrics {
    pub commands_sent: u64,
    pub commands_failed: u64,
    pub commands_timed_out: u64,
    pub reconnect_count: u64,
    pub queue_len: usize,
    pub queue_high_water: usize,
    pub connection_state: &'static str,
    pub combatant_count: usize,
}

struct Metrics {
    commands_sent: u64,
    commands_failed: u64,
    commands_timed_out: u64,
    reconnect_count: u64,
}

/// Owns the live connection and everything derived from it. Cheaply
/// cloneable: clones share the same background worker.
pub struct GameServerAdapter<Conn, C>
where
    Conn: TransportConnector,
    C: Clock,
{
    inner: Arc<Inner<Conn, C>>,
}

impl<Conn, C> Clone for GameServerAdapter<Conn, C>
where
    Conn: TransportConnector,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

struct Inner<Conn, C>
where
    Conn: TransportConnector,
    C: Clock,
{
    connector: Conn,
    clock: C,
    config: AdapterConfig,
    state: SyncMutex<ConnectionState>,
    transport: AsyncMutex<Option<Box<dyn Transport>>>,
    queue: SyncMutex<CommandQueue>,
    combat: SyncMutex<CombatTracker>,
    templates: SyncMutex<HashMap<String, String>>,
    events: broadcast::Sender<Event>,
    combat_events: broadcast::Sender<fleet_core::combat::CombatEvent>,
    combat_snapshots: broadcast::Sender<HashMap<String, CombatantState>>,
    combat_store: Option<AtomicStore<HashMap<String, CombatantState>, C>>,
    metrics: SyncMutex<Metrics>,
}

/// Handle to the background task driving connect/reconnect and the
/// periodic heartbeat/snapshot/persistence/cleanup activities.
pub struct AdapterRunHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl AdapterRunHandle {
    pub async fn stop(self) {
        self.stop_tx.send(true).ok();
        self.join.abort();
    }
}

impl<Conn, C> GameServerAdapter<Conn, C>
where
    Conn: TransportConnector + Send + Sync + 'static,
    C: Clock,
{
    pub fn new(
        connector: Conn,
        clock: C,
        config: AdapterConfig,
        friendlies: Vec<String>,
        combat_store: Option<AtomicStore<HashMap<String, CombatantState>, C>>,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        let (combat_events, _) = broadcast::channel(256);
        let (combat_snapshots, _) = broadcast::channel(16);
        let combat = CombatTracker::new(&config, friendlies);
        Self {
            inner: Arc::new(Inner {
                connector,
                clock,
                config,
                state: SyncMutex::new(ConnectionState::Disconnected),
                transport: AsyncMutex::new(None),
                queue: SyncMutex::new(CommandQueue::new()),
                combat: SyncMutex::new(combat),
                templates: SyncMutex::new(HashMap::new()),
                events,
                combat_events,
                combat_snapshots,
                combat_store,
                metrics: SyncMutex::new(Metrics {
                    commands_sent: 0,
                    commands_failed: 0,
                    commands_timed_out: 0,
                    reconnect_count: 0,
                }),
            }),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    pub fn subscribe_combat_snapshots(&self) -> broadcast::Receiver<HashMap<String, CombatantState>> {
        self.inner.combat_snapshots.subscribe()
    }

    pub fn subscribe_combat_events(&self) -> broadcast::Receiver<fleet_core::combat::CombatEvent> {
        self.inner.combat_events.subscribe()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    pub fn combatant(&self, entity_id: &str) -> Option<CombatantState> {
        self.inner.combat.lock().combatant(entity_id).cloned()
    }

    /// Start the background worker: connect loop with backoff, plus the
    /// periodic heartbeat/snapshot/persistence/cleanup activities.
    pub fn spawn(&self) -> AdapterRunHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let adapter = self.clone();
        let join = tokio::spawn(async move { adapter.run(stop_rx).await });
        AdapterRunHandle { stop_tx, join }
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        let mut attempt: u32 = 0;
        loop {
            if *stop_rx.borrow() {
                return;
            }
            match self.try_connect().await {
                Ok(()) => {
                    attempt = 0;
                    self.drive_connected(&mut stop_rx).await;
                    if *stop_rx.borrow() {
                        return;
                    }
                    if !self.connection_state().allows_reconnect() {
                        return;
                    }
                }
                Err(_) => {
                    let delay = self.inner.config.reconnect_delay(attempt);
                    self.emit(Event::AdapterReconnectScheduled {
                        attempt,
                        delay_ms: delay.as_millis() as u64,
                        at: self.inner.clock.epoch_ms(),
                    });
                    attempt = attempt.saturating_add(1);
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = stop_rx.changed() => {
                            if *stop_rx.borrow() {
                                return;
                            }
                        }
                    }
                }
            }
        }
    }

    async fn try_connect(&self) -> Result<(), AdapterError> {
        *self.inner.state.lock() = ConnectionState::Connecting;
        match self.inner.connector.connect().await {
            Ok(transport) => {
                *self.inner.transport.lock().await = Some(transport);
                *self.inner.state.lock() = ConnectionState::Connected;
                self.emit(Event::AdapterConnected { at: self.inner.clock.epoch_ms() });
                Ok(())
            }
            Err(reason) => {
                *self.inner.state.lock() = ConnectionState::Disconnected;
                self.inner.metrics.lock().reconnect_count += 1;
                Err(AdapterError::ConnectRefused(reason))
            }
        }
    }

    async fn drive_connected(&self, stop_rx: &mut watch::Receiver<bool>) {
        let mut heartbeat = tokio::time::interval(self.inner.config.heartbeat_interval());
        let mut snapshot = tokio::time::interval(self.inner.config.snapshot_interval());
        let mut cleanup = tokio::time::interval(self.inner.config.cleanup_interval);
        let persistence_interval = self.inner.config.snapshot_persistence_interval();

        loop {
            if !self.connection_state().is_connected() {
                return;
            }
            let persistence_tick = async {
                match persistence_interval {
                    Some(d) => tokio::time::sleep(d).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::select! {
                _ = heartbeat.tick() => {
                    let command = self.inner.config.heartbeat_command.clone();
                    if let Err(err) = self.send_command(command).await {
                        tracing::warn!(error = %err, "heartbeat command failed");
                    }
                }
                _ = snapshot.tick() => {
                    let snap = self.inner.combat.lock().snapshot();
                    self.inner.combat_snapshots.send(snap).ok();
                }
                _ = persistence_tick => {
                    if let Some(store) = &self.inner.combat_store {
                        let snap = self.inner.combat.lock().snapshot();
                        store.schedule_save(snap);
                    }
                }
                _ = cleanup.tick() => {
                    let now = self.inner.clock.epoch_ms();
                    self.inner.combat.lock().cleanup(now, &self.inner.config);
                }
                _ = self.process_one_queued_command() => {}
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        self.disconnect_internal("shutdown").await;
                        return;
                    }
                }
            }
        }
    }

    async fn process_one_queued_command(&self) {
        let entry = self.inner.queue.lock().pop();
        let Some(entry) = entry else {
            tokio::time::sleep(self.inner.config.min_command_spacing()).await;
            return;
        };

        tokio::time::sleep(self.inner.config.min_command_spacing()).await;

        let result = self.send_raw(&entry.command).await;
        match &result {
            Ok(_) => self.inner.metrics.lock().commands_sent += 1,
            Err(AdapterError::Timeout(_)) => self.inner.metrics.lock().commands_timed_out += 1,
            Err(_) => self.inner.metrics.lock().commands_failed += 1,
        }
        if matches!(result, Err(AdapterError::Disconnected)) {
            self.disconnect_internal("transport closed").await;
        }
        entry.reply.send(result).ok();
    }

    async fn send_raw(&self, command: &str) -> Result<String, AdapterError> {
        let timeout = self.inner.config.command_timeout();
        let mut guard = self.inner.transport.lock().await;
        let Some(transport) = guard.as_mut() else {
            return Err(AdapterError::Disconnected);
        };
        let response = send_with_timeout(timeout, transport.send(command)).await;
        if let Ok(text) = &response {
            self.ingest_response(text);
        }
        response
    }

    fn ingest_response(&self, response: &str) {
        let now = self.inner.clock.epoch_ms();
        for line in response.lines() {
            if let Some(parsed) = feedback::parse_line(line, now) {
                let outcome = self.inner.combat.lock().accept(parsed, &self.inner.config);
                if let Some(event) = outcome.event {
                    if outcome.friendly_fire {
                        self.emit(Event::FriendlyFire {
                            source: event.source.clone().unwrap_or_default(),
                            target: event.target.clone().unwrap_or_default(),
                            at: now,
                        });
                    }
                    self.inner.combat_events.send(event).ok();
                }
            }
        }
    }

    async fn disconnect_internal(&self, reason: &str) {
        *self.inner.state.lock() = ConnectionState::Disconnected;
        if let Some(mut transport) = self.inner.transport.lock().await.take() {
            transport.close().await;
        }
        self.inner.queue.lock().drain_with_disconnect();
        self.emit(Event::AdapterDisconnected {
            reason: reason.to_string(),
            at: self.inner.clock.epoch_ms(),
        });
    }

    /// Manually disconnect; inhibits automatic reconnect until `connect()`
    /// is invoked again via a fresh `spawn()`.
    pub async fn disconnect(&self) {
        *self.inner.state.lock() = ConnectionState::ManualDisconnect;
        self.disconnect_internal("manual disconnect").await;
    }

    /// Enqueue `command`, awaiting its response subject to the configured
    /// rate limit and per-command timeout.
    pub async fn send_command(&self, command: impl Into<String>) -> Result<String, AdapterError> {
        if !self.connection_state().is_connected() {
            return Err(AdapterError::Disconnected);
        }
        let rx = enqueue(&self.inner.queue, &self.inner.clock, command.into());
        rx.await.unwrap_or(Err(AdapterError::Disconnected))
    }

    pub async fn send_batch(&self, commands: Vec<String>) -> Vec<Result<String, AdapterError>> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            results.push(self.send_command(command).await);
        }
        results
    }

    pub async fn dispatch_task(&self, bot_id: &BotId, task: &str) -> Result<String, AdapterError> {
        let command = format!("{} {} {}", self.inner.config.command_prefix, bot_id, task);
        self.send_command(command).await
    }

    /// Summon `entity_id` at `position`, waiting `post_spawn_delay` before
    /// issuing any follow-up appearance commands.
    pub async fn spawn_entity(
        &self,
        entity_id: &str,
        position: Position,
        post_spawn_commands: Vec<String>,
    ) -> Result<(), AdapterError> {
        self.emit(Event::AdapterSpawnRequested {
            entity_id: entity_id.to_string(),
            at: self.inner.clock.epoch_ms(),
        });
        let summon = format!("summon {} {} {} {}", entity_id, position.x, position.y, position.z);
        self.send_command(summon).await?;
        if !post_spawn_commands.is_empty() {
            tokio::time::sleep(self.inner.config.post_spawn_delay).await;
            for command in post_spawn_commands {
                self.send_command(command).await?;
            }
        }
        Ok(())
    }

    pub fn register_command_template(&self, name: impl Into<String>, template: impl Into<String>) {
        self.inner.templates.lock().insert(name.into(), template.into());
    }

    /// Substitute `{0}`, `{1}`, ... in the named template with `args`, then
    /// send the resulting command.
    pub async fn execute_command_template(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<String, AdapterError> {
        let template = self
            .inner
            .templates
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| AdapterError::UnknownTemplate(name.to_string()))?;
        let mut command = template;
        for (index, arg) in args.iter().enumerate() {
            command = command.replace(&format!("{{{index}}}"), arg);
        }
        self.send_command(command).await
    }

    pub fn get_metrics(&self) -> AdapterMetrics {
        let metrics = self.inner.metrics.lock();
        let queue = self.inner.queue.lock();
        AdapterMetrics {
            commands_sent: metrics.commands_sent,
            commands_failed: metrics.commands_failed,
            commands_timed_out: metrics.commands_timed_out,
            reconnect_count: metrics.reconnect_count,
            queue_len: queue.len(),
            queue_high_water: queue.high_water_mark(),
            connection_state: match self.connection_state() {
                ConnectionState::Disconnected => "disconnected",
                ConnectionState::Connecting => "connecting",
                ConnectionState::Connected => "connected",
                ConnectionState::Disconnecting => "disconnecting",
                ConnectionState::ManualDisconnect => "manual_disconnect",
            },
            combatant_count: self.inner.combat.lock().snapshot().len(),
        }
    }

    pub async fn shutdown(&self) {
        self.disconnect().await;
        if let Some(store) = &self.inner.combat_store {
            store.flush().await.ok();
        }
    }

    fn emit(&self, event: Event) {
        self.inner.events.send(event).ok();
    }
}

#[async_trait]
impl<Conn, C> fleet_microcore::WorldLink for GameServerAdapter<Conn, C>
where
    Conn: TransportConnector + Send + Sync + 'static,
    C: Clock,
{
    async fn move_bot(&self, bot_id: BotId, delta: Position) -> Result<(), String> {
        let command = format!("tp {} ~{} ~{} ~{}", bot_id, delta.x, delta.y, delta.z);
        self.send_command(command).await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn scan(&self, bot_id: BotId, radius: f64) -> Result<String, String> {
        let command = format!("scan {bot_id} {radius}");
        self.send_command(command).await.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
