//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS)
//! - Bind server to listener
//! - Serve until the shutdown broadcast fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CorsConfig, ServiceConfig, ServiceIdentity};
use crate::http::handlers::{create_message, health, list_messages, ready, service_status};
use crate::http::request::{request_id_header, MakeRequestUuidV4, RequestIdExt};
use crate::messages::MessageLog;
use crate::observability::metrics;
use crate::store::ListStore;

/// Application state injected into handlers.
pub struct AppState<S> {
    pub log: Arc<MessageLog<S>>,
    pub identity: Arc<ServiceIdentity>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            identity: Arc::clone(&self.identity),
        }
    }
}

impl<S: ListStore> AppState<S> {
    /// Build the message log described by `config` on top of `store`.
    pub fn new(config: &ServiceConfig, store: S) -> Self {
        let log = MessageLog::new(store, config.store.key.clone(), config.service.hostname.clone())
            .with_counter_key(config.store.counter_key.clone())
            .with_id_strategy(config.store.id_strategy);

        Self {
            log: Arc::new(log),
            identity: Arc::new(config.service.clone()),
        }
    }
}

/// HTTP server for the message API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and store.
    pub fn new<S: ListStore>(config: ServiceConfig, store: S) -> Self {
        tracing::info!(
            backend = store.backend(),
            key = %config.store.key,
            id_strategy = ?config.store.id_strategy,
            "Message log ready"
        );
        let state = AppState::new(&config, store);
        let router = build_router(&config, state);
        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router<S: ListStore>(config: &ServiceConfig, state: AppState<S>) -> Router {
    let routes = Router::new()
        .route("/", get(service_status::<S>))
        .route("/health", get(health))
        .route("/ready", get(ready::<S>))
        .route(
            "/api/messages",
            get(list_messages::<S>).post(create_message::<S>),
        )
        .route_layer(middleware::from_fn(metrics::track_metrics))
        .with_state(state);

    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(cors_layer(&config.cors)),
    )
}

/// CORS policy for browser clients.
///
/// A `"*"` entry allows any origin without credentials; otherwise only the
/// listed origins are echoed back.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([request_id_header()]);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, request_id_header()])
        .expose_headers([request_id_header()])
}
