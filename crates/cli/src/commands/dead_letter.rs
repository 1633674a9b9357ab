// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetctl dead-letters` - inspect and drain the dead-letter queue

use clap::Subcommand;

use crate::app::App;
use crate::output::{handle_list, OutputFormat};

#[derive(Subcommand)]
pub enum DeadLetterCommand {
    /// List queued dead-letter entries
    List,
    /// Re-attempt every queued entry against the game server
    Retry,
}

pub async fn dead_letters(command: DeadLetterCommand, format: OutputFormat) -> anyhow::Result<()> {
    let app = App::open().await?;
    match command {
        DeadLetterCommand::List => {
            let entries = app.supervisor.dead_letter_queue();
            handle_list(format, &entries, "No dead-lettered bots", |entries| {
                for entry in entries {
                    println!(
                        "{} {} fail_count={} last_error={}",
                        entry.id, entry.profile.name, entry.fail_count, entry.last_error
                    );
                }
            })
        }
        DeadLetterCommand::Retry => {
            let drained = app.supervisor.retry_dead_letter_queue().await?;
            app.flush().await?;
            match format {
                OutputFormat::Json => {
                    let obj = serde_json::json!({
                        "successes": drained.successes,
                        "failures": drained.failures,
                    });
                    println!("{}", serde_json::to_string_pretty(&obj)?);
                }
                OutputFormat::Text => println!(
                    "recovered {} bot(s), {} still dead-lettered",
                    drained.successes.len(),
                    drained.failures.len()
                ),
            }
            Ok(())
        }
    }
}
