// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl respawn` - re-request a spawn for an existing registry entry

use clap::Args;
use fleet_core::{BotId, Position};
use fleet_supervisor::RespawnOptions;

use crate::app::App;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct RespawnArgs {
    /// Bot id, as printed by `fleetctl spawn`/`fleetctl list`
    pub id: String,

    #[arg(long, default_value_t = 0.0)]
    pub x: f64,
    #[arg(long, default_value_t = 0.0)]
    pub y: f64,
    #[arg(long, default_value_t = 0.0)]
    pub z: f64,
}

pub async fn respawn(args: RespawnArgs, format: OutputFormat) -> anyhow::Result<()> {
    let app = App::open().await?;
    let id = BotId::from_string(&args.id);
    let options = RespawnOptions { position: Position::new(args.x, args.y, args.z) };
    let outcome = app.supervisor.respawn(&id, options).await?;
    app.flush().await?;
    super::spawn::print_outcome(&outcome, format)
}
