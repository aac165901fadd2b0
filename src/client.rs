//! Typed HTTP client for the message API.
//!
//! Used by the `demo-cli` binary and the integration tests.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::http::ErrorBody;
use crate::messages::{HealthStatus, Message, MessageCreated, MessageList, NewMessage, ServiceStatus};

/// Errors returned by [`MessagesClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport or decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {detail}")]
    Status { status: u16, detail: String },
}

/// Client for one API base URL (e.g. `http://localhost:8000`).
#[derive(Debug, Clone)]
pub struct MessagesClient {
    client: Client,
    base_url: String,
}

impl MessagesClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /`.
    pub async fn status(&self) -> Result<ServiceStatus, ClientError> {
        self.get("/").await
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get("/health").await
    }

    /// `GET /ready`.
    pub async fn ready(&self) -> Result<HealthStatus, ClientError> {
        self.get("/ready").await
    }

    /// `GET /api/messages`.
    pub async fn list(&self) -> Result<MessageList, ClientError> {
        self.get("/api/messages").await
    }

    /// `POST /api/messages`; returns the stored message.
    pub async fn post(&self, text: &str) -> Result<Message, ClientError> {
        let resp = self
            .client
            .post(format!("{}/api/messages", self.base_url))
            .json(&NewMessage {
                text: text.to_string(),
            })
            .send()
            .await?;

        let created: MessageCreated = decode(resp).await?;
        Ok(created.data)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await?;
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        detail,
    })
}
