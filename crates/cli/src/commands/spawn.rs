// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl spawn` - request one bot

use clap::Args;
use fleet_core::{PersonalityVector, Position};
use fleet_supervisor::{SpawnOptions, SpawnOutcome};

use crate::app::App;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct SpawnArgs {
    /// Archetype: miner, builder, explorer, guard, farmer, or any custom name
    #[arg(long, default_value = "miner")]
    pub role: String,

    /// Bot name; defaults to the role name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, default_value_t = 0.0)]
    pub x: f64,
    #[arg(long, default_value_t = 0.0)]
    pub y: f64,
    #[arg(long, default_value_t = 0.0)]
    pub z: f64,

    /// Commands sent after the entity is summoned (e.g. equipment grants)
    #[arg(long = "post-spawn-command")]
    pub post_spawn_commands: Vec<String>,
}

pub async fn spawn(args: SpawnArgs, format: OutputFormat) -> anyhow::Result<()> {
    let app = App::open().await?;
    let options = SpawnOptions {
        name: args.name,
        role: super::parse_role(&args.role),
        description: args.description,
        personality: None::<PersonalityVector>,
        world_entity_type: None,
        appearance: None,
        position: Position::new(args.x, args.y, args.z),
        post_spawn_commands: args.post_spawn_commands,
    };

    let outcome = app.supervisor.spawn(options).await?;
    app.flush().await?;
    print_outcome(&outcome, format)
}

pub fn print_outcome(outcome: &SpawnOutcome, format: OutputFormat) -> anyhow::Result<()> {
    match outcome {
        SpawnOutcome::Spawned(identity) => format_or_json(format, identity, || {
            println!("spawned {} ({}) at {:?}", identity.name, identity.id, identity.last_known_position);
        }),
        SpawnOutcome::DeadLettered(entry) => format_or_json(format, entry, || {
            println!(
                "dead-lettered {} after {} failed attempt(s): {}",
                entry.profile.name, entry.fail_count, entry.last_error
            );
        }),
    }
}
