//! `slotwise` CLI — rank meeting slots from a scheduling snapshot.
//!
//! A snapshot is a JSON document with `events`, `time_slots`, `users` and
//! `availability` arrays.
//!
//! ## Usage
//!
//! ```sh
//! # Rank the slots of event 1 (snapshot on stdin, JSON on stdout)
//! slotwise recommend --event 1 < team.json
//!
//! # From file to file, searching on a 5-minute grid
//! slotwise recommend --event 1 -i team.json -o recs.json --step-minutes 5
//!
//! # Check a snapshot without computing anything
//! slotwise validate -i team.json
//!
//! # Page through events
//! slotwise events -i team.json --limit 5 --offset 10
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` or pass `--verbose` to see them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slotwise_engine::recommend::DEFAULT_STEP_MINUTES;
use slotwise_engine::store::DEFAULT_PAGE_LIMIT;
use slotwise_engine::{InMemoryStore, RecommendConfig, RecommendationService};
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slotwise",
    version,
    about = "Rank candidate meeting slots by participant availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute ranked slot recommendations for an event
    Recommend {
        /// Event to schedule
        #[arg(short, long)]
        event: u64,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Spacing between candidate start times, in minutes
        #[arg(long, env = "SLOTWISE_STEP_MINUTES", default_value_t = DEFAULT_STEP_MINUTES)]
        step_minutes: u32,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Validate a snapshot and report record counts
    Validate {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List events in the snapshot
    Events {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Maximum number of events to show
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
        /// Number of events to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Recommend {
            event,
            input,
            output,
            step_minutes,
            compact,
        } => {
            let store = load_store(input.as_deref())?;
            let config = RecommendConfig::new(step_minutes).context("Invalid --step-minutes")?;
            let service = RecommendationService::with_config(&store, config);

            let recommendations = service
                .get_recommendations(event)
                .with_context(|| format!("Failed to compute recommendations for event {}", event))?;
            info!(event, count = recommendations.len(), "recommendations computed");

            let json = if compact {
                serde_json::to_string(&recommendations)?
            } else {
                serde_json::to_string_pretty(&recommendations)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Validate { input } => {
            let store = load_store(input.as_deref())?;
            println!("Snapshot OK");
            println!("Events:        {}", store.event_count());
            println!("Time slots:    {}", store.time_slot_count());
            println!("Users:         {}", store.user_count());
            println!("Availability:  {}", store.availability_count());
        }
        Commands::Events {
            input,
            limit,
            offset,
        } => {
            let store = load_store(input.as_deref())?;
            let events = store
                .list_events(limit, offset)
                .context("Failed to list events")?;
            for event in events {
                println!(
                    "{}\t{}\t{} min",
                    event.id, event.title, event.duration_minutes
                );
            }
        }
    }

    Ok(())
}

/// Install a stderr subscriber so stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_store(path: Option<&str>) -> Result<InMemoryStore> {
    let json = read_input(path)?;
    let store = InMemoryStore::from_json(&json).context("Failed to load snapshot")?;
    debug!(
        events = store.event_count(),
        slots = store.time_slot_count(),
        users = store.user_count(),
        availability = store.availability_count(),
        "snapshot loaded"
    );
    Ok(store)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
