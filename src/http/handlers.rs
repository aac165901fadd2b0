//! Route handlers.
//!
//! Thin glue between axum extractors and the message log: every handler
//! does one log call and shapes the JSON envelope around it.

use axum::{extract::State, Json};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::messages::types::now_timestamp;
use crate::messages::{
    HealthStatus, LogError, MessageCreated, MessageList, NewMessage, ServiceStatus,
};
use crate::observability::metrics;
use crate::store::ListStore;

/// `GET /` — service identity and liveness.
pub async fn service_status<S: ListStore>(State(state): State<AppState<S>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "healthy".to_string(),
        service: state.identity.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.identity.environment.clone(),
        timestamp: now_timestamp(),
        hostname: state.identity.hostname.clone(),
    })
}

/// `GET /health` — liveness only; never touches the store.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

/// `GET /ready` — the store answers.
pub async fn ready<S: ListStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<HealthStatus>, ApiError> {
    state.log.ping().await.map_err(|e| store_failure("ping", e))?;
    Ok(Json(HealthStatus {
        status: "ready".to_string(),
    }))
}

/// `GET /api/messages` — full log, oldest first.
pub async fn list_messages<S: ListStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<MessageList>, ApiError> {
    let messages = state
        .log
        .list_all()
        .await
        .map_err(|e| store_failure("list", e))?;

    Ok(Json(MessageList {
        count: messages.len(),
        messages,
        timestamp: now_timestamp(),
    }))
}

/// `POST /api/messages` — append one message.
pub async fn create_message<S: ListStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<NewMessage>,
) -> Result<Json<MessageCreated>, ApiError> {
    let message = match state.log.append(&body.text).await {
        Ok(message) => message,
        Err(LogError::Validation(detail)) => {
            tracing::debug!(detail = %detail, "Rejected message");
            return Err(LogError::Validation(detail).into());
        }
        Err(e) => return Err(store_failure("append", e)),
    };

    metrics::record_append();
    tracing::info!(id = message.id, origin = %message.origin, "Message created");

    Ok(Json(MessageCreated {
        message: "Message created successfully".to_string(),
        data: message,
    }))
}

fn store_failure(operation: &'static str, err: LogError) -> ApiError {
    if matches!(err, LogError::StoreUnavailable(_)) {
        metrics::record_store_error(operation);
    }
    tracing::error!(operation, error = %err, "Message log operation failed");
    err.into()
}
