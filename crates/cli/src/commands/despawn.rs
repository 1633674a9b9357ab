// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl despawn` - stop one bot and mark it inactive

use clap::Args;
use fleet_core::BotId;
use fleet_supervisor::SupervisorError;

use crate::app::App;
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct DespawnArgs {
    /// Bot id, as printed by `fleetctl spawn`/`fleetctl list`
    pub id: String,
}

pub async fn despawn(args: DespawnArgs) -> anyhow::Result<()> {
    let app = App::open().await?;
    let id = BotId::from_string(&args.id);
    match app.supervisor.despawn(&id).await {
        Ok(()) => {
            app.flush().await?;
            println!("despawned {}", args.id);
            Ok(())
        }
        Err(SupervisorError::NotFound(id)) => {
            Err(ExitError::new(2, format!("no such bot: {id}")).into())
        }
        Err(e) => Err(e.into()),
    }
}
