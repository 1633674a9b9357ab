// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl list` - show registry entries

use clap::Args;

use crate::app::App;
use crate::output::{handle_list, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Only show bots currently marked active
    #[arg(long)]
    pub active_only: bool,

    /// Filter by role (miner, builder, explorer, guard, farmer, or a custom name)
    #[arg(long)]
    pub role: Option<String>,
}

pub async fn list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let app = App::open().await?;
    let mut bots = if args.active_only {
        app.registry.list_active()
    } else {
        app.registry.get_all()
    };
    if let Some(role) = &args.role {
        bots.retain(|b| b.role.to_string() == *role);
    }

    handle_list(format, &bots, "No bots registered", |bots| {
        for bot in bots {
            println!(
                "{} {} role={} status={} spawn_count={} pos={:?}",
                bot.id, bot.name, bot.role, bot.status, bot.spawn_count, bot.last_known_position
            );
        }
    })
}
