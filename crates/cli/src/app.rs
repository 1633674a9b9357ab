// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the registry, learning store, game-server adapter, microcore
//! scheduler, and supervisor into one handle, loaded fresh by every
//! one-shot command and kept alive for the lifetime of `fleetctl serve`.

use std::sync::Arc;

use fleet_adapter::{AdapterConfig, GameServerAdapter, RconConnector};
use fleet_core::SystemClock;
use fleet_learning::LearningStore;
use fleet_microcore::{MicrocoreConfig, MicrocoreManager};
use fleet_registry::BotRegistry;
use fleet_supervisor::{BotSupervisor, SupervisorConfig};

use crate::env;
use crate::exit_error::ExitError;

pub type Adapter = GameServerAdapter<RconConnector, SystemClock>;
pub type Microcore = MicrocoreManager<Adapter, SystemClock>;
pub type Supervisor = BotSupervisor<RconConnector, SystemClock>;

/// Everything a command needs, opened against the on-disk state directory.
pub struct App {
    pub registry: Arc<BotRegistry<SystemClock>>,
    pub learning: Arc<LearningStore<SystemClock>>,
    pub adapter: Adapter,
    pub microcore: Arc<Microcore>,
    pub supervisor: Arc<Supervisor>,
}

impl App {
    pub async fn open() -> anyhow::Result<Self> {
        let dir = env::state_dir()?;
        std::fs::create_dir_all(&dir)?;
        let clock = SystemClock;

        let registry =
            Arc::new(BotRegistry::open(dir.join("registry.json"), clock.clone()).await?);
        let learning = Arc::new(
            LearningStore::open(dir.join("profiles.json"), dir.join("knowledge.json"), clock.clone())
                .await?,
        );

        let password = env::rcon_password()
            .ok_or_else(|| ExitError::new(2, "FLEET_RCON_PASSWORD is missing or empty"))?;
        let connector = RconConnector::new(env::game_server_addr(), password);
        let adapter =
            GameServerAdapter::new(connector, clock.clone(), AdapterConfig::default(), Vec::new(), None);
        let microcore = Arc::new(MicrocoreManager::new(
            Arc::new(adapter.clone()),
            clock.clone(),
            MicrocoreConfig::default(),
        ));

        let supervisor = Arc::new(
            BotSupervisor::open(
                dir.join("dead_letters.json"),
                registry.clone(),
                learning.clone(),
                adapter.clone(),
                microcore.clone(),
                clock,
                SupervisorConfig::default(),
            )
            .await?,
        );

        Ok(Self { registry, learning, adapter, microcore, supervisor })
    }

    pub async fn flush(&self) -> anyhow::Result<()> {
        self.registry.flush().await?;
        self.learning.flush().await?;
        Ok(())
    }
}
