//! Psyclin service
//!
//! Serves search, dashboard and listing endpoints in front of the clinic
//! backend.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use psyclin::api::{create_router, AppState};
use psyclin::{spawn_cleanup_task, Config};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the backend client and caches
/// 4. Start one TTL cleanup task per cache
/// 5. Serve the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "psyclin=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Psyclin service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api_base_url={}, port={}, cleanup_interval={}s, max_entries={:?}",
        config.api_base_url,
        config.server_port,
        config.cache_cleanup_interval,
        config.cache_max_entries
    );

    let state = AppState::from_config(&config).context("failed to build backend client")?;

    let interval = config.cleanup_interval();
    let cleanup_handles = vec![
        spawn_cleanup_task("search", state.engine.cache(), interval),
        spawn_cleanup_task("dashboard", state.dashboard.cache(), interval),
        spawn_cleanup_task("lists", state.lists.cache(), interval),
    ];
    info!("Background cleanup tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handles))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the cleanup tasks.
async fn shutdown_signal(cleanup_handles: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(%err, "Failed to listen for Ctrl+C");
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
                warn!(%err, "Failed to install SIGTERM handler");
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

    for handle in cleanup_handles {
        handle.abort();
    }
    warn!("Cleanup tasks aborted");
}
