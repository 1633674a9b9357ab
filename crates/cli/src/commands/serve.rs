// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl serve` - run the long-lived service: the adapter's
//! connection/reconnect loop and the push channel. The HTTP admin API
//! is a separate external layer this binary does not implement; operators
//! drive spawn/despawn/list/team/dead-letter operations through the other
//! `fleetctl` subcommands instead.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::app::App;
use crate::env;

pub async fn serve() -> anyhow::Result<()> {
    let app = Arc::new(App::open().await?);
    let adapter_handle = app.adapter.spawn();

    let (combat_snapshots_tx, _) = tokio::sync::broadcast::channel(16);
    let (combat_events_tx, _) = tokio::sync::broadcast::channel(256);
    let push_server = Arc::new(fleet_eventbus::PushServer::new(
        fleet_core::SystemClock,
        combat_snapshots_tx.clone(),
        combat_events_tx.clone(),
    ));

    let mut adapter_snapshots = app.adapter.subscribe_combat_snapshots();
    let mut adapter_events = app.adapter.subscribe_combat_events();
    let forward = tokio::spawn(async move {
        loop {
            tokio::select! {
                snapshot = adapter_snapshots.recv() => {
                    match snapshot {
                        Ok(state) => { combat_snapshots_tx.send(state).ok(); }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    }
                }
                event = adapter_events.recv() => {
                    match event {
                        Ok(event) => { combat_events_tx.send(event).ok(); }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    }
                }
            }
        }
    });

    let (stop_tx, stop_rx) = watch::channel(false);

    let push_listener = TcpListener::bind(env::push_bind_addr()?).await?;
    tracing::info!(addr = %push_listener.local_addr()?, "push channel listening");
    let push_task = tokio::spawn(push_server.serve(push_listener, stop_rx.clone()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    stop_tx.send(true).ok();
    adapter_handle.stop().await;
    forward.abort();
    push_task.await.ok();
    app.flush().await?;
    Ok(())
}
