//! Error responses.
//!
//! # Responsibilities
//! - Map log errors to HTTP status codes
//! - Render a `{"detail": ...}` body for every error
//!
//! # Design Decisions
//! - Validation problems are 400 and never retried by the server
//! - Store failures are 503 with the cause embedded in the detail
//! - Encoding failures are 500; they indicate a bug, not a client mistake

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::messages::LogError;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// An error a handler can return directly.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<LogError> for ApiError {
    fn from(err: LogError) -> Self {
        let status = match &err {
            LogError::Validation(_) => StatusCode::BAD_REQUEST,
            LogError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LogError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
