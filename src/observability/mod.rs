//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → telemetry.rs (spans exported over OTLP, optional)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Trace collector (OTLP, `otel` feature)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every request span
//! - Metrics are cheap (no-ops until an exporter is installed)
//! - Span export is optional; the message log only emits spans

pub mod logging;
pub mod metrics;
pub mod telemetry;

pub use logging::init_logging;
pub use telemetry::{TelemetryError, TelemetryGuard};
