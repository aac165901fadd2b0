//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Bind the listener
//! - Build the configured store and hand it to the HTTP server
//!
//! # Design Decisions
//! - Fail fast: bind and metrics errors are fatal
//! - Redis reachability is not a startup condition; `/ready` reports it

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ServiceConfig, StoreBackend};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::store::{ListStore, MemoryStore, RedisStore, StoreError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("metrics setup failed: {0}")]
    Metrics(String),
}

/// Run the service until `shutdown` fires.
pub async fn run(config: ServiceConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e| StartupError::Metrics(format!("bad metrics address: {}", e)))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    tracing::info!(
        address = %listener.local_addr()?,
        hostname = %config.service.hostname,
        "Listening for connections"
    );

    match config.store.backend {
        StoreBackend::Memory => serve(config, MemoryStore::new(), listener, shutdown).await,
        StoreBackend::Redis => {
            let store = RedisStore::new(&config.store)?;
            serve(config, store, listener, shutdown).await
        }
    }
}

async fn serve<S: ListStore>(
    config: ServiceConfig,
    store: S,
    listener: TcpListener,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
