//! Doc Cache - A document-store backed distributed cache
//!
//! Serves the cache over HTTP on top of an in-process document store and
//! runs garbage collection on a fixed interval.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doc_cache::api::create_router;
use doc_cache::store::MemoryStore;
use doc_cache::{spawn_gc_task, AppState, Config, DistributedCache};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache over the document store
/// 4. Start the periodic garbage-collection task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Doc Cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: collection={}, port={}, gc_interval={}s, gc_page_size={}",
        config.collection, config.server_port, config.gc_interval, config.gc_page_size
    );

    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(
        DistributedCache::new(config.cache_config(), store).context("Invalid cache configuration")?,
    );
    info!("Cache initialized on collection '{}'", cache.collection());

    let shutdown = CancellationToken::new();
    let gc_handle = spawn_gc_task(
        cache.clone(),
        Duration::from_secs(config.gc_interval),
        shutdown.clone(),
    );

    let app = create_router(AppState::with_shutdown(cache, shutdown.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    if let Err(e) = gc_handle.await {
        warn!("Garbage collection task ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then cancels background work.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

    shutdown.cancel();
}
