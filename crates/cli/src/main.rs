// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl` - operate a fleet of autonomous NPC bots against a game
//! server: spawn/despawn/respawn, team presets, dead-letter recovery,
//! and the long-lived adapter/push service (`fleetctl serve`).

mod app;
mod commands;
mod env;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};

use commands::dead_letter::DeadLetterCommand;
use commands::despawn::DespawnArgs;
use commands::list::ListArgs;
use commands::respawn::RespawnArgs;
use commands::spawn::SpawnArgs;
use commands::team::SpawnTeamArgs;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "fleetctl", version, about = "Fleet management control plane for autonomous NPC bots")]
struct Cli {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Spawn one bot
    Spawn(SpawnArgs),
    /// Despawn one bot
    Despawn(DespawnArgs),
    /// Re-request a spawn for an existing registry entry
    Respawn(RespawnArgs),
    /// Expand a named team preset into a batch of spawns
    SpawnTeam(SpawnTeamArgs),
    /// List registered bots
    List(ListArgs),
    /// Inspect or drain the dead-letter queue
    DeadLetters {
        #[command(subcommand)]
        command: DeadLetterCommand,
    },
    /// Run the long-lived service: adapter connection and push channel
    Serve,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        if let Some(exit_error) = err.downcast_ref::<ExitError>() {
            eprintln!("error: {}", exit_error.message);
            std::process::exit(exit_error.code);
        }
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Spawn(args) => commands::spawn::spawn(args, cli.output).await,
        Command::Despawn(args) => commands::despawn::despawn(args).await,
        Command::Respawn(args) => commands::respawn::respawn(args, cli.output).await,
        Command::SpawnTeam(args) => commands::team::spawn_team(args, cli.output).await,
        Command::List(args) => commands::list::list(args, cli.output).await,
        Command::DeadLetters { command } => commands::dead_letter::dead_letters(command, cli.output).await,
        Command::Serve => commands::serve::serve().await,
    }
}
