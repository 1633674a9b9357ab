// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push-channel (WebSocket) server. Each client receives a hello message
//! on connect, may narrow its subscription to a subset of message types,
//! and is fed combat snapshots, combat events, and per-entity combat
//! updates as they are broadcast. Ping/pong keeps the connection alive;
//! malformed client messages get an error reply, never a disconnect.

use std::collections::HashMap;
use std::sync::Arc;

use fleet_core::combat::{CombatEvent, CombatantState};
use fleet_core::Clock;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, watch};
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Subscribe { events: Vec<String> },
    Ping,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Hello { at: u64 },
    CombatSnapshot { at: u64, state: HashMap<String, CombatantState> },
    CombatEvents { events: Vec<CombatEvent> },
    CombatUpdate { entity_id: String, state: CombatantState },
    Subscribed { events: Vec<String> },
    Pong { at: u64 },
    Error { message: String },
}

impl ServerMessage {
    fn type_tag(&self) -> &'static str {
        match self {
            Self::Hello { .. } => "hello",
            Self::CombatSnapshot { .. } => "combat_snapshot",
            Self::CombatEvents { .. } => "combat_events",
            Self::CombatUpdate { .. } => "combat_update",
            Self::Subscribed { .. } => "subscribed",
            Self::Pong { .. } => "pong",
            Self::Error { .. } => "error",
        }
    }
}

/// Accepts push-channel clients over a bound `TcpListener` and relays
/// combat snapshots/events broadcast by the adapter.
pub struct PushServer<C: Clock> {
    clock: C,
    combat_snapshots: broadcast::Sender<HashMap<String, CombatantState>>,
    combat_events: broadcast::Sender<CombatEvent>,
}

impl<C: Clock> PushServer<C> {
    pub fn new(
        clock: C,
        combat_snapshots: broadcast::Sender<HashMap<String, CombatantState>>,
        combat_events: broadcast::Sender<CombatEvent>,
    ) -> Self {
        Self { clock, combat_snapshots, combat_events }
    }

    /// Accept connections on `listener` until `stop_rx` reports true.
    pub async fn serve(self: Arc<Self>, listener: TcpListener, mut stop_rx: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            let server = self.clone();
                            tracing::info!(%addr, "push channel client connected");
                            tokio::spawn(async move { server.handle_connection(stream).await });
                        }
                        Err(e) => tracing::warn!(error = %e, "push channel accept failed"),
                    }
                }
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        return;
                    }
                }
            }
        }
    }

    async fn handle_connection(self: Arc<Self>, stream: TcpStream) {
        let ws_stream = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                tracing::warn!(error = %e, "push channel handshake failed");
                return;
            }
        };
        let (mut write, mut read) = ws_stream.split();

        if send(&mut write, &ServerMessage::Hello { at: self.clock.epoch_ms() }).await.is_err() {
            return;
        }

        let mut subscription: Option<Vec<String>> = None;
        let mut last_snapshot: HashMap<String, CombatantState> = HashMap::new();
        let mut snapshots = self.combat_snapshots.subscribe();
        let mut events = self.combat_events.subscribe();

        loop {
            tokio::select! {
                incoming = read.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            if self.handle_client_message(&text, &mut subscription, &mut write).await.is_err() {
                                return;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => return,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "push channel read error");
                            return;
                        }
                    }
                }
                snapshot = snapshots.recv() => {
                    let Ok(state) = snapshot else { continue };
                    last_snapshot = state.clone();
                    if accepts(&subscription, "combat_snapshot") {
                        let message = ServerMessage::CombatSnapshot { at: self.clock.epoch_ms(), state };
                        if send(&mut write, &message).await.is_err() {
                            return;
                        }
                    }
                }
                event = events.recv() => {
                    let Ok(event) = event else { continue };
                    if accepts(&subscription, "combat_events") {
                        let message = ServerMessage::CombatEvents { events: vec![event.clone()] };
                        if send(&mut write, &message).await.is_err() {
                            return;
                        }
                    }
                    if accepts(&subscription, "combat_update") {
                        for entity_id in [event.source.as_ref(), event.target.as_ref()].into_iter().flatten() {
                            if let Some(state) = last_snapshot.get(entity_id).cloned() {
                                let message = ServerMessage::CombatUpdate { entity_id: entity_id.clone(), state };
                                if send(&mut write, &message).await.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    async fn handle_client_message(
        &self,
        text: &str,
        subscription: &mut Option<Vec<String>>,
        write: &mut (impl futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin),
    ) -> Result<(), ()> {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Subscribe { events }) => {
                *subscription = Some(events.clone());
                send(write, &ServerMessage::Subscribed { events }).await
            }
            Ok(ClientMessage::Ping) => send(write, &ServerMessage::Pong { at: self.clock.epoch_ms() }).await,
            Err(e) => {
                send(write, &ServerMessage::Error { message: format!("invalid message: {e}") }).await
            }
        }
    }
}

/// `None` (no subscription set yet) or an empty list both mean "accept
/// everything", matching the push-channel default-subscribed behavior.
fn accepts(subscription: &Option<Vec<String>>, message_type: &str) -> bool {
    match subscription {
        None => true,
        Some(types) => types.is_empty() || types.iter().any(|t| t == message_type),
    }
}

async fn send(
    write: &mut (impl futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin),
    message: &ServerMessage,
) -> Result<(), ()> {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, kind = message.type_tag(), "failed to serialize push message");
            return Err(());
        }
    };
    write.send(Message::Text(text.into())).await.map_err(|e| {
        tracing::warn!(error = %e, "push channel send failed");
    })
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
