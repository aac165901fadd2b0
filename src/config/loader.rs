//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{LogFormat, ServiceConfig, StoreBackend};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then the
/// environment. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML file without validating it.
pub fn parse_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables on `config`.
///
/// `lookup` abstracts `std::env::var` so tests do not touch the real
/// process environment.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup("SERVICE_NAME") {
        config.service.name = name;
    }
    if let Some(environment) = lookup("ENVIRONMENT") {
        config.service.environment = environment;
    }
    if let Some(hostname) = lookup("HOSTNAME") {
        config.service.hostname = hostname;
    }
    if let Some(bind) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = bind;
    }

    // A redis host on its own is enough to opt into the shared store.
    if let Some(host) = lookup("REDIS_HOST") {
        config.store.host = host;
        config.store.backend = StoreBackend::Redis;
    }
    if let Some(backend) = lookup("STORE_BACKEND") {
        config.store.backend = backend.parse().map_err(|_| ConfigError::Env {
            var: "STORE_BACKEND",
            value: backend.clone(),
        })?;
    }
    if let Some(port) = lookup("REDIS_PORT") {
        config.store.port = port.trim().parse().map_err(|_| ConfigError::Env {
            var: "REDIS_PORT",
            value: port.clone(),
        })?;
    }
    if let Some(db) = lookup("REDIS_DB") {
        config.store.db = db.trim().parse().map_err(|_| ConfigError::Env {
            var: "REDIS_DB",
            value: db.clone(),
        })?;
    }

    if let Some(endpoint) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT") {
        if !endpoint.trim().is_empty() {
            config.observability.otlp_endpoint = Some(endpoint);
        }
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.observability.log_format = match format.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" | "text" => LogFormat::Pretty,
            _ => {
                return Err(ConfigError::Env {
                    var: "LOG_FORMAT",
                    value: format,
                })
            }
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_empty_environment_keeps_defaults() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, env(&[])).unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.service.hostname, "unknown");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_redis_host_selects_redis_backend() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("REDIS_HOST", "redis.demo.svc"), ("REDIS_PORT", "6380"), ("HOSTNAME", "api-7f9c")]),
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.redis_url(), "redis://redis.demo.svc:6380/0");
        assert_eq!(config.service.hostname, "api-7f9c");
    }

    #[test]
    fn test_store_backend_overrides_redis_host() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("REDIS_HOST", "redis"), ("STORE_BACKEND", "memory")]),
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let mut config = ServiceConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("REDIS_PORT", "sixty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "REDIS_PORT", .. }));
    }

    #[test]
    fn test_otlp_endpoint_and_log_format() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://otel-collector:4317"),
                ("LOG_FORMAT", "JSON"),
            ]),
        )
        .unwrap();
        assert_eq!(
            config.observability.otlp_endpoint.as_deref(),
            Some("http://otel-collector:4317")
        );
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [store]
            backend = "redis"
            id_strategy = "length"

            [service]
            environment = "staging"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.id_strategy, crate::config::IdStrategy::Length);
        assert_eq!(config.store.port, 6379);
        assert_eq!(config.service.environment, "staging");
        assert_eq!(config.service.name, "Demo API");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError { field: "store.key", message: "must not be empty".into() },
            ValidationError { field: "store.port", message: "must be non-zero".into() },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: store.key: must not be empty, store.port: must be non-zero"
        );
    }
}
