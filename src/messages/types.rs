//! Message record and the JSON envelopes built around it.
//!
//! These types are shared by the server handlers and the typed client, so
//! both sides agree on the wire shape.

use serde::{Deserialize, Serialize};

/// One entry in the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position-derived identifier, starting at 1.
    pub id: u64,

    /// Text exactly as submitted.
    pub text: String,

    /// UTC creation time, RFC 3339 with microseconds.
    #[serde(rename = "timestamp")]
    pub created_at: String,

    /// Process/host that performed the append.
    #[serde(rename = "hostname")]
    pub origin: String,
}

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub text: String,
}

/// Body of `GET /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
    pub count: usize,
    pub timestamp: String,
}

/// Body of a successful `POST /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreated {
    pub message: String,
    pub data: Message,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
    pub hostname: String,
}

/// Body of `GET /health` and `GET /ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Current UTC time in the sortable form used for every timestamp.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
