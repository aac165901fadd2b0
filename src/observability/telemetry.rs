//! Distributed tracing export.
//!
//! # Responsibilities
//! - Build the OTLP span exporter and tracer provider (`otel` feature)
//! - Tag exported spans with service name, version, environment, host
//! - Flush pending spans on shutdown
//!
//! # Design Decisions
//! - Optional: compiled out by default
//! - The message log never depends on whether an exporter is present

use thiserror::Error;

#[cfg(feature = "otel")]
use crate::config::ServiceIdentity;

/// Errors raised while setting up logging or span export.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Keeps the tracer provider alive; dropping it flushes and shuts down export.
#[derive(Default)]
pub struct TelemetryGuard {
    #[cfg(feature = "otel")]
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        #[cfg(feature = "otel")]
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to flush span exporter");
            }
        }
    }
}

/// Build a tracing layer that exports spans to `endpoint` over OTLP/gRPC.
#[cfg(feature = "otel")]
pub fn otlp_layer<S>(
    endpoint: &str,
    service: &ServiceIdentity,
) -> Result<
    (
        tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>,
        TelemetryGuard,
    ),
    TelemetryError,
>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![
            KeyValue::new("service.name", service.name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("deployment.environment", service.environment.clone()),
            KeyValue::new("host.name", service.hostname.clone()),
        ]))
        .build();

    let tracer = provider.tracer("demo-api");
    let layer = tracing_opentelemetry::layer().with_tracer(tracer);

    Ok((
        layer,
        TelemetryGuard {
            provider: Some(provider),
        },
    ))
}
