//! Cache Engine - an HTTP key-value cache with per-entry TTL
//!
//! Binary entry point: wires configuration, logging, storage, admission
//! control and the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_engine::admission::{AdmissionController, AdmissionPolicy};
use cache_engine::cache::MemoryStore;
use cache_engine::{create_router, spawn_sweeper_task, AppState, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load `.env` and configuration from environment variables
/// 3. Create the store (failure aborts startup)
/// 4. Start the background sweeper
/// 5. Create Axum router with admission control and all endpoints
/// 6. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cache Engine server");

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, port={}, base_url='{}', rate_limit={}/{}s, cleanup_interval={}s",
        config.default_ttl,
        config.server_port,
        config.base_url,
        config.rate_limit_max,
        config.rate_limit_window,
        config.cleanup_interval
    );

    let store = Arc::new(MemoryStore::from_config(&config).context("failed to initialize cache store")?);
    let limiter = Arc::new(AdmissionController::new(AdmissionPolicy::from_config(&config)));
    info!("Cache store initialized");

    let sweeper_handle = spawn_sweeper_task(store.clone(), limiter.clone(), config.cleanup_interval);

    let state = AppState::new(store, limiter);
    let app = create_router(state, &config.base_url);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}{}", addr, config.base_url);

    // Peer addresses feed the loopback bypass.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(sweeper_handle))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the sweeper.
async fn shutdown_signal(sweeper_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweeper_handle.abort();
    warn!("Sweeper task aborted");
}
