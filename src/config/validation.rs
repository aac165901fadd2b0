//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check that addresses parse before anything binds to them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{StoreBackend, ServiceConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.service.hostname.trim().is_empty() {
        errors.push(ValidationError::new("service.hostname", "must not be empty"));
    }

    let store = &config.store;
    if store.backend == StoreBackend::Redis {
        if store.host.trim().is_empty() {
            errors.push(ValidationError::new("store.host", "must not be empty"));
        }
        if store.port == 0 {
            errors.push(ValidationError::new("store.port", "must be non-zero"));
        }
        if store.db < 0 {
            errors.push(ValidationError::new("store.db", "must not be negative"));
        }
    }
    if store.key.is_empty() {
        errors.push(ValidationError::new("store.key", "must not be empty"));
    }
    if store.counter_key.is_empty() {
        errors.push(ValidationError::new("store.counter_key", "must not be empty"));
    } else if store.counter_key == store.key {
        errors.push(ValidationError::new(
            "store.counter_key",
            "must differ from store.key",
        ));
    }
    if store.timeout_ms == 0 {
        errors.push(ValidationError::new("store.timeout_ms", "must be non-zero"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be non-zero"));
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::new(
            "cors.allowed_origins",
            "must list at least one origin (use \"*\" for any)",
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be non-zero"));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }
    if let Some(endpoint) = &obs.otlp_endpoint {
        if endpoint.trim().is_empty() {
            errors.push(ValidationError::new(
                "observability.otlp_endpoint",
                "must not be blank when set",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
