// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! antler - distributed active-network tester

mod commands;
mod exit_error;
mod filter;
mod logging;
mod worker;

include!(concat!(env!("OUT_DIR"), "/embedded_workers.rs"));

use anyhow::Result;
use clap::{Parser, Subcommand};
use exit_error::ExitError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "antler", version, about = "A distributed active-network tester")]
struct Cli {
    /// Path to the run's TOML configuration file
    #[arg(short, long, global = true, default_value = "antler.toml")]
    config: PathBuf,

    /// Directory result directories are promoted under
    #[arg(short = 'r', long, global = true, default_value = "results")]
    results: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enumerate Tests matching the given filters
    List {
        /// Value regex, or key=value pair-regex; filters combine by AND
        filters: Vec<String>,
    },
    /// Execute Tests matching the given filters
    Run {
        /// Value regex, or key=value pair-regex; filters combine by AND
        filters: Vec<String>,
        /// Overwrite a Test's existing result data instead of skipping it
        #[arg(short, long)]
        force: bool,
    },
    /// Re-run "after" report pipelines against previously saved data
    Report {
        /// Value regex, or key=value pair-regex; filters combine by AND
        filters: Vec<String>,
    },
    /// Load and structurally validate a configuration file without running anything
    Vet,
    /// Runs this process as a worker node; only ever invoked by a launcher
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        node_id: String,
    },
}

#[tokio::main]
async fn main() {
    let Cli { config, results, command } = Cli::parse();

    if let Command::Worker { node_id } = command {
        // The worker path never touches the config file or a terminal; it
        // only speaks the wire protocol over its inherited stdio.
        let mut registry = antler_launch::BinaryRegistry::new();
        register_embedded_workers(&mut registry);
        worker::main(node_id, std::sync::Arc::new(registry)).await;
        return;
    }

    let _guard = logging::init(matches!(command, Command::Run { .. }), &results);

    if let Err(err) = run(&config, &results, command).await {
        let code = err.downcast_ref::<ExitError>().map_or(1, |e| e.code);
        eprintln!("Error: {err:#}");
        std::process::exit(code);
    }
}

async fn run(config_path: &PathBuf, results: &PathBuf, command: Command) -> Result<()> {
    let config = antler_config::load(config_path)?;

    let mut registry = antler_launch::BinaryRegistry::new();
    register_embedded_workers(&mut registry);
    let registry = std::sync::Arc::new(registry);

    match command {
        Command::Vet => commands::vet::handle(&config),
        Command::List { filters } => commands::list::handle(&config, &filters),
        Command::Run { filters, force } => commands::run::handle(&config, results, registry, force, &filters).await,
        Command::Report { filters } => commands::report::handle(&config, results, registry, &filters).await,
        Command::Worker { .. } => unreachable!("handled before config load"),
    }
}
