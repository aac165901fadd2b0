//! Demo message API (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http server ──▶ handlers ──▶ message log   │
//!                             │   (request id,                    │          │
//!                             │    trace, cors)                   ▼          │
//!     Client Response         │                               ListStore      │
//!     ◀───────────────────────┼── {"detail"} / JSON          ┌────┴─────┐    │
//!                             │                             memory    redis ─┼──▶ Redis
//!                             │                                              │
//!                             │  config · observability · lifecycle          │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use demo_api::config::load_config;
use demo_api::lifecycle::{self, Shutdown};
use demo_api::observability::init_logging;

#[derive(Parser)]
#[command(name = "demo-api")]
#[command(about = "Demo message API", version)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "DEMO_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref())?;

    // Initialize tracing subscriber; the guard flushes exported spans on exit
    let _telemetry = init_logging(&config.observability, &config.service)?;

    tracing::info!("demo-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        store = ?config.store.backend,
        environment = %config.service.environment,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    lifecycle::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
