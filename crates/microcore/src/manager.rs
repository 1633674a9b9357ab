// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The async wrapper around [`crate::tick::advance`]: one cooperative task
//! per bot, driven by an interval timer, fed by an inbox channel, and
//! stoppable idempotently.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use fleet_core::{BotId, BotStatus, Clock, Event, InboxEvent, MicrocoreState, Position, StatusSnapshot};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::tick::{advance, apply_scan_result, MicrocoreConfig};

/// The microcore's only outbound dependency on the game-server adapter.
/// Kept as a trait here (rather than a direct dependency on the adapter
/// crate) to avoid a cyclic crate dependency.
#[async_trait]
pub trait WorldLink: Send + Sync + 'static {
    async fn move_bot(&self, bot_id: BotId, delta: Position) -> Result<(), String>;
    async fn scan(&self, bot_id: BotId, radius: f64) -> Result<String, String>;
}

struct MicrocoreHandle {
    inbox: mpsc::UnboundedSender<InboxEvent>,
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// Owns one tick task per active bot.
pub struct MicrocoreManager<W: WorldLink, C: Clock> {
    world: Arc<W>,
    clock: C,
    config: MicrocoreConfig,
    handles: Mutex<HashMap<BotId, MicrocoreHandle>>,
    events: broadcast::Sender<Event>,
    snapshots: broadcast::Sender<StatusSnapshot>,
}

impl<W: WorldLink, C: Clock> MicrocoreManager<W, C> {
    pub fn new(world: Arc<W>, clock: C, config: MicrocoreConfig) -> Self {
        let (events, _) = broadcast::channel(1024);
        let (snapshots, _) = broadcast::channel(1024);
        Self {
            world,
            clock,
            config,
            handles: Mutex::new(HashMap::new()),
            events,
            snapshots,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<StatusSnapshot> {
        self.snapshots.subscribe()
    }

    /// Start (or restart) a bot's tick loop. Any previously running loop
    /// for this bot is stopped first, so calling `start` twice in a row
    /// is safe and simply replaces the loop.
    pub fn start(&self, bot_id: BotId, position: Position) {
        self.stop(&bot_id);

        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel::<InboxEvent>();
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let world = Arc::clone(&self.world);
        let clock = self.clock.clone();
        let config = self.config;
        let events = self.events.clone();
        let snapshots = self.snapshots.clone();

        let join = tokio::spawn(async move {
            let mut state = MicrocoreState::new(bot_id, position);
            let mut pending: VecDeque<InboxEvent> = VecDeque::new();
            let mut interval = tokio::time::interval(std::time::Duration::from_millis(
                config.clamped_tick_rate_ms(),
            ));
            let mut last_tick_ms = clock.epoch_ms().saturating_sub(config.clamped_tick_rate_ms());

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        while let Ok(event) = inbox_rx.try_recv() {
                            pending.push_back(event);
                        }

                        let now_ms = clock.epoch_ms();
                        let elapsed = now_ms.saturating_sub(last_tick_ms).max(1);
                        last_tick_ms = now_ms;

                        let outcome = advance(
                            &mut state,
                            &mut pending,
                            elapsed,
                            &config,
                            now_ms,
                            BotStatus::Active,
                        );

                        if let Some(delta) = outcome.move_delta {
                            if let Err(reason) = world.move_bot(bot_id, delta).await {
                                warn!(%bot_id, %reason, "move_bot failed");
                                events
                                    .send(Event::MicrocoreError { id: bot_id, reason, at: now_ms })
                                    .ok();
                            } else {
                                events
                                    .send(Event::MicrocoreMove { id: bot_id, position: state.position, at: now_ms })
                                    .ok();
                            }
                        }

                        if let Some(task) = &outcome.task_just_completed {
                            events
                                .send(Event::MicrocoreTaskComplete {
                                    id: bot_id,
                                    task: task.clone(),
                                    at: now_ms,
                                })
                                .ok();
                        }

                        if outcome.should_scan {
                            match world.scan(bot_id, config.scan_radius).await {
                                Ok(result) => apply_scan_result(&mut state, result, now_ms),
                                Err(reason) => {
                                    warn!(%bot_id, %reason, "scan failed");
                                    events
                                        .send(Event::MicrocoreError { id: bot_id, reason, at: now_ms })
                                        .ok();
                                }
                            }
                        }

                        events
                            .send(Event::MicrocoreStatus {
                                id: bot_id,
                                reason: outcome.snapshot.reason.clone(),
                                tick_count: outcome.snapshot.tick_count,
                                at: now_ms,
                            })
                            .ok();
                        snapshots.send(outcome.snapshot).ok();
                    }
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        self.handles.lock().insert(
            bot_id,
            MicrocoreHandle {
                inbox: inbox_tx,
                stop_tx,
                join,
            },
        );
    }

    /// Stop a bot's tick loop. A bot with no running loop is a no-op, so
    /// calling `stop` twice in a row is safe.
    pub fn stop(&self, bot_id: &BotId) {
        if let Some(handle) = self.handles.lock().remove(bot_id) {
            handle.stop_tx.send(true).ok();
            handle.join.abort();
        }
    }

    /// Queue an inbox event for delivery at the bot's next tick. Silently
    /// dropped if the bot has no running loop.
    pub fn send(&self, bot_id: &BotId, event: InboxEvent) {
        if let Some(handle) = self.handles.lock().get(bot_id) {
            handle.inbox.send(event).ok();
        }
    }

    pub fn is_running(&self, bot_id: &BotId) -> bool {
        self.handles.lock().contains_key(bot_id)
    }

    pub fn running_count(&self) -> usize {
        self.handles.lock().len()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
