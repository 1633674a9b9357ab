// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl spawn-team` - expand a named preset into a batch of spawns

use clap::Args;
use fleet_core::Position;
use fleet_supervisor::SpawnTeamOptions;

use crate::app::App;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct SpawnTeamArgs {
    /// mining, building, exploration, combat, farming, or balanced
    pub preset: String,

    #[arg(long)]
    pub name_prefix: Option<String>,

    #[arg(long, default_value_t = 0.0)]
    pub x: f64,
    #[arg(long, default_value_t = 0.0)]
    pub y: f64,
    #[arg(long, default_value_t = 0.0)]
    pub z: f64,
}

pub async fn spawn_team(args: SpawnTeamArgs, format: OutputFormat) -> anyhow::Result<()> {
    let app = App::open().await?;
    let options = SpawnTeamOptions {
        position: Position::new(args.x, args.y, args.z),
        name_prefix: args.name_prefix,
    };
    let outcomes = app.supervisor.spawn_team(&args.preset, options).await?;
    app.flush().await?;
    for outcome in &outcomes {
        super::spawn::print_outcome(outcome, format)?;
    }
    Ok(())
}
