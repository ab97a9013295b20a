//! # EvType Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the `evtype` CLI, a chatbot that tells whether an electric
//! vehicle is a battery electric (BEV) or plug-in hybrid (PHEV) model, using a
//! vehicle population dataset. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the `ask`, `chat` and `srv` handlers
//!
//! ## Architecture
//!
//! - `predictor`: dataset, lookup, classifier and the dialogue state machine
//! - `common`: dataset loaders, archive helpers and terminal rendering
//! - `core`: configuration, errors and page templating
//! - `commands`: one module per subcommand
//!
//! All errors are propagated to this level for consistent handling.
//!
//! ## Examples
//!
//! ```bash
//! # Talk to the bot in the terminal
//! evtype chat
//!
//! # One-shot answer with a range estimate
//! evtype ask "Nissan Leaf" --range 150
//!
//! # Web chat on http://127.0.0.1:8501 with debug logging
//! evtype -vv srv --data ev_population.csv.gz
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;
mod predictor;

#[derive(Parser, Debug)]
#[command(
    name = "evtype",
    about = "EV Type Predictor: is it a BEV or a PHEV?",
    long_about = "Chat about electric vehicles. Give a make and model plus a rough electric range,\n\
                  and evtype answers with its type according to the vehicle population dataset.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Dataset to load (.csv, .csv.gz, .tar, .tar.gz, .tgz). Overrides `[dataset] path`.
    #[arg(long, global = true, env = "EVTYPE_DATA")]
    data: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Classify one make/model and exit.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Chat in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Serve the web chat page and JSON API.
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let data = cli.data.as_deref();
    let command_result = match cli.command {
        Commands::Ask(args) => commands::ask::handle_ask(args, data).await,
        Commands::Chat(args) => commands::chat::handle_chat(args, data).await,
        Commands::Srv(args) => commands::srv::handle_srv(args, data).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
