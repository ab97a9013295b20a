//! # EvType Web Chat Server
//!
//! File: cli/src/commands/srv/mod.rs
//!
//! ## Overview
//!
//! Serves the chat page and a small JSON API over HTTP. Each browser tab gets
//! its own conversation; all of them share one dataset, which can be replaced
//! at runtime by uploading a `.csv` (optionally gzipped or inside a tar).
//!
//! ## Architecture
//!
//! - `config.rs`: merges flags with the `[server]` configuration section
//! - `sessions.rs`: shared state, the dataset snapshot and per-session conversations
//! - `handlers.rs`: Axum handlers and the JSON error type
//! - `server_logic.rs`: router, middleware, port selection and graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the default 127.0.0.1:8501
//! evtype srv
//!
//! # Expose on the network with a specific dataset
//! evtype srv --host 0.0.0.0 --port 9000 --data ~/data/ev_population.tar.gz
//! ```
//!
use crate::core::error::Result;
use std::path::Path;
use tracing::info;

pub use config::SrvArgs;

/// Effective server settings from flags and configuration.
pub mod config;

/// Route handlers for the page and the JSON API.
pub mod handlers;

/// Router construction and the server loop.
pub mod server_logic;

/// Dataset snapshot and per-session conversation store.
pub mod sessions;

/// Entry point for `evtype srv`.
///
/// Loads configuration and the initial dataset, then serves until shutdown.
/// A dataset that fails to load is fatal here; later uploads that fail are not.
///
/// ## Arguments
///
/// * `args`: Parsed `srv` flags.
/// * `data`: The global `--data` override, if given.
///
/// ## Errors
///
/// Returns an error if the configuration or dataset cannot be loaded, or if
/// the server cannot bind a port.
pub async fn handle_srv(args: SrvArgs, data: Option<&Path>) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let (cfg, dataset) = super::load_dataset(data)?;
    let config = config::ServerConfig::resolve(&args, &cfg, data)?;
    info!("Effective server config: {:?}", config);

    let state = sessions::AppState::new(dataset, &config.title);
    server_logic::run_server(config, state).await?;

    Ok(())
}
