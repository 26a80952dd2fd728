//! Gazelle - A distributed read-through cache node
//!
//! Serves one demo group backed by an in-memory "slow database" and joins
//! the peers listed in `PEERS`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::runtime::Handle;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gazelle::api::create_router;
use gazelle::{AppState, Config, GroupRegistry, HttpPool, LoaderFn};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the demo group with its source loader
/// 4. Build the peer pool and attach it to the group
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazelle=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gazelle cache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, cache_bytes={}, replicas={}, port={}",
        config.self_url, config.peers, config.cache_bytes, config.replicas, config.server_port
    );

    let registry = Arc::new(GroupRegistry::new());
    let group = registry.new_group(config.group_name.as_str(), config.cache_bytes, slow_db());

    let pool = Arc::new(HttpPool::with_replicas(
        config.self_url.clone(),
        config.replicas,
        Handle::current(),
    ));
    pool.set_peers(config.peers.iter().cloned());
    if let Err(err) = group.register_peers(pool) {
        error!("Failed to attach peers: {}", err);
        return;
    }
    info!("Group '{}' ready", group.name());

    let app = create_router(AppState::new(registry));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Node listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Node shutdown complete");
}

/// Demo source: a tiny fixed table standing in for a slow database.
fn slow_db() -> LoaderFn<impl Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync> {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    LoaderFn(move |key: &str| -> anyhow::Result<Vec<u8>> {
        info!("[SlowDB] search key {}", key);
        db.get(key)
            .map(|value| value.as_bytes().to_vec())
            .ok_or_else(|| anyhow!("{key} not exist"))
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
}
