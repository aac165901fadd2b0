//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Pick pretty or JSON output
//! - Attach the OTLP layer when telemetry export is configured
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - JSON format for production, pretty format for development

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig, ServiceIdentity};
use crate::observability::telemetry::{TelemetryError, TelemetryGuard};

/// Default filter directive for a configured level.
pub fn default_directive(level: &str) -> String {
    format!("demo_api={level},tower_http={level}", level = level)
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered spans are flushed.
pub fn init_logging(
    config: &ObservabilityConfig,
    service: &ServiceIdentity,
) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.log_level).into());

    let (json, pretty) = match config.log_format {
        LogFormat::Json => (Some(fmt::layer().json()), None),
        LogFormat::Pretty => (None, Some(fmt::layer())),
    };

    #[cfg(feature = "otel")]
    let (otel, guard) = match config.otlp_endpoint.as_deref() {
        Some(endpoint) => {
            let (layer, guard) = crate::observability::telemetry::otlp_layer(endpoint, service)?;
            (Some(layer), guard)
        }
        None => (None, TelemetryGuard::default()),
    };

    #[cfg(not(feature = "otel"))]
    let (otel, guard) = (
        None::<tracing_subscriber::layer::Identity>,
        TelemetryGuard::default(),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .with(otel)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

    tracing::info!(
        service = %service.name,
        environment = %service.environment,
        format = ?config.log_format,
        "Logging initialized"
    );

    #[cfg(not(feature = "otel"))]
    if let Some(endpoint) = &config.otlp_endpoint {
        tracing::warn!(
            endpoint = %endpoint,
            "OTLP endpoint configured but span export is not compiled in (enable the `otel` feature)"
        );
    }

    Ok(guard)
}
