// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vigil - a habit-streak support bot backend.
//!
//! This is the binary entry point: it loads and validates configuration,
//! initializes tracing, and runs the selected subcommand.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Vigil - a habit-streak support bot backend.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook gateway and event dispatcher.
    Serve,
    /// Run diagnostic checks against the configured environment.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match vigil_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vigil_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG overrides the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor) => doctor::run_doctor(&config).await,
        None => {
            println!("vigil: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal");
        std::process::exit(1);
    }
}
