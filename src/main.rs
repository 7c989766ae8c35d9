//! # Feedline
//!
//! A Rust web service that serves a reshaped Twitter/X feed to a web UI.
//!
//! ## Environment Variables
//!
//! - `TWITTER_CONSUMER_KEY`, `TWITTER_CONSUMER_SECRET`, `TWITTER_ACCESS_TOKEN`,
//!   `TWITTER_ACCESS_TOKEN_SECRET`: OAuth 1.0a credentials (timeline, profiles)
//! - `TWITTER_BEARER_TOKEN`: Bearer Token (trends, search)
//! - `TWITTER_ACCOUNT_ID`: id of the owning account
//! - `PORT`: Server port (defaults to 3000)
//! - `RUST_LOG`: Log level
//!
//! ## API Endpoints
//!
//! - `GET /timeline`, `GET /trends`, `GET /tweets/search/:query`,
//!   `GET /users/:id`, `GET /users/me`, `GET /health`

use log::{error, info};
use std::net::SocketAddr;

use feedline::{create_router, get_server_port, AppState, FeedConfig, TwitterClient};

/// Main entry point for the feedline web service.
///
/// Initializes logging, loads the configuration, and serves HTTP until Ctrl-C
/// or SIGTERM. Missing credentials do not prevent startup; the endpoints that
/// need them answer with a configuration error instead.
///
/// # Example Usage
///
/// ```bash
/// # Run with default port 3000
/// cargo run
///
/// # Run on custom port with debug logging
/// PORT=8080 RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = match FeedConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let client = match TwitterClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build upstream HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(AppState { client });

    let port = get_server_port();
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Starting feedline server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
    }
    info!("Server stopped");
}

/// Resolves when the process receives Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
