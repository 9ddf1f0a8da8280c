// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::Parser;
use gearbook_api::Collaborators;
use gearbook_audit::{Actor, TracingAuditRecorder, TracingNotifier};
use gearbook_domain::UserId;
use gearbook_persistence::{Persistence, StoreOptions};
use tracing::info;

use crate::commands::Command;

/// Gearbook - equipment availability and issuance for event rentals
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "GEARBOOK_DATABASE")]
    database: Option<String>,

    /// How long a write waits for another connection's lock, in milliseconds
    #[arg(long, default_value_t = 5000)]
    busy_timeout_ms: u32,

    /// Keep the rollback journal instead of switching to write-ahead logging
    #[arg(long)]
    no_wal: bool,

    /// User id recorded as the actor of every change
    #[arg(long, env = "GEARBOOK_ACTOR", default_value_t = 1)]
    actor: i64,

    /// Display name of the actor
    #[arg(long, default_value = "operator")]
    actor_name: String,

    #[command(subcommand)]
    command: Command,
}

fn open_store(args: &Args) -> Result<Persistence, Box<dyn std::error::Error>> {
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(
            db_path,
            &StoreOptions {
                busy_timeout_ms: args.busy_timeout_ms,
                wal: !args.no_wal,
            },
        )?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut persistence: Persistence = open_store(&args)?;
    let actor: Actor = Actor::new(UserId::new(args.actor), &args.actor_name);
    let audit: TracingAuditRecorder = TracingAuditRecorder;
    let notifier: TracingNotifier = TracingNotifier;
    let collaborators: Collaborators<'_> = Collaborators::new(&audit, &notifier);

    let output: String = commands::run(args.command, &mut persistence, &collaborators, &actor)?;
    println!("{output}");
    Ok(())
}
