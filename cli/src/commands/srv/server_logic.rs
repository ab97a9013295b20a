//! # Chat Server Logic
//!
//! File: cli/src/commands/srv/server_logic.rs
//!
//! ## Overview
//!
//! Binds the listener, builds the Axum router and serves until Ctrl+C or
//! SIGTERM. If the configured port is taken, the next few ports are tried.
//!
//! Middleware, outermost last:
//! - `TraceLayer`: request/response logging through `tracing`
//! - `CorsLayer`: permissive when enabled, a no-op otherwise
//!
//! `PUT /api/dataset` carries its own body limit; the Axum default (2 MB) is
//! far below the size of a real population export.
//!
use super::config::ServerConfig;
use super::handlers;
use super::sessions::AppState;
use crate::core::error::Result;
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// Largest accepted dataset upload.
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

const MAX_PORT_ATTEMPTS: u8 = 10;

/// Binds the first free port from `config.port` upward and serves until Ctrl+C or SIGTERM.
///
/// ## Arguments
///
/// * `config`: Resolved host, port, CORS switch and title.
/// * `state`: Shared dataset and session store handed to every handler.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` after a graceful shutdown.
///
/// ## Errors
///
/// This function can return errors if:
/// - No port is free within `MAX_PORT_ATTEMPTS` attempts.
/// - Binding the `TcpListener` fails.
/// - The Axum server stops with an error.
pub async fn run_server(config: ServerConfig, state: AppState) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let summary = state.dataset()?.summary();
    let app = create_app(state, config.enable_cors);

    println!("\n=================================================================");
    println!("{}", config.title);
    println!("Dataset:        {} ({} records)", summary.source, summary.records);
    println!("Local URL:      http://{}", addr);
    if addr.ip().is_unspecified() {
        println!("Listening on all interfaces, port {}", addr.port());
    }
    println!("CORS enabled:   {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting chat server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn find_available_port(
    host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(host, port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!("Port {} was unavailable, using {}.", start_port, port);
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: port {} on {} is unavailable ({}). Trying next port...",
                    attempt + 1,
                    port,
                    host,
                    e
                );
                port = port.checked_add(1).with_context(|| {
                    format!("Ran out of ports while searching from {}", start_port)
                })?;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on {} starting from {} after trying {} ports.",
        host,
        start_port,
        max_attempts
    )
}

/// Builds the router with request tracing, the upload size limit and optional CORS.
///
/// ## Arguments
///
/// * `state`: Shared state for the handlers.
/// * `enable_cors`: Adds a permissive `CorsLayer` when true.
///
/// ## Returns
///
/// * `Router`: Ready to be served, or driven directly with `oneshot` in tests.
pub fn create_app(state: AppState, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/sessions/{id}/messages", post(handlers::post_message))
        .route(
            "/api/sessions/{id}/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .route(
            "/api/dataset",
            get(handlers::get_dataset)
                .put(handlers::put_dataset)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace_layer).layer(cors_layer))
}
