// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MultiGPT - chat with several hosted models, or let auto mode pick one.
//!
//! This is the binary entry point.

mod commands;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use multigpt_config::MultigptConfig;

/// MultiGPT - a multi-model chat client with automatic model routing.
#[derive(Parser, Debug)]
#[command(name = "multigpt", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available models.
    Models,
    /// Show which model auto mode picks for a query.
    Route {
        /// The query to route.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Start an interactive chat.
    Chat {
        /// Model id, or `auto` to route each message.
        #[arg(long, short)]
        model: Option<String>,
    },
    /// Print the effective configuration (API key redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => multigpt_config::load_and_validate_path(path),
        None => multigpt_config::load_and_validate(),
    };
    let config: MultigptConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            multigpt_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.chat.log_level);

    let result = match cli.command {
        Some(Commands::Models) => {
            commands::print_models();
            Ok(())
        }
        Some(Commands::Route { query }) => commands::run_route(&config, &query.join(" ")).await,
        Some(Commands::Chat { model }) => shell::run_shell(config, model).await,
        Some(Commands::Config) => commands::print_config(&config),
        None => {
            println!("multigpt: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("multigpt={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
