//! Append-only message log on top of a [`ListStore`].

use thiserror::Error;
use tracing::instrument;

use crate::config::IdStrategy;
use crate::messages::types::{now_timestamp, Message};
use crate::store::{ListStore, NumberedRecord, StoreError};

/// Errors returned by log operations.
#[derive(Debug, Error)]
pub enum LogError {
    /// Caller supplied unusable input.
    #[error("{0}")]
    Validation(String),

    /// Backing store unreachable, refused, or timed out.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// A record could not be serialized.
    #[error("Message could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ordered, ID-stamped message storage.
#[derive(Debug, Clone)]
pub struct MessageLog<S> {
    store: S,
    key: String,
    counter_key: String,
    origin: String,
    ids: IdStrategy,
}

impl<S: ListStore> MessageLog<S> {
    /// Create a log over `store`, keeping entries under `key`.
    pub fn new(store: S, key: impl Into<String>, origin: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            counter_key: format!("{}:next_id", key),
            key,
            origin: origin.into(),
            store,
            ids: IdStrategy::Counter,
        }
    }

    /// Override the counter key used by [`IdStrategy::Counter`].
    pub fn with_counter_key(mut self, counter_key: impl Into<String>) -> Self {
        self.counter_key = counter_key.into();
        self
    }

    /// Choose how ids are assigned.
    pub fn with_id_strategy(mut self, ids: IdStrategy) -> Self {
        self.ids = ids;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append a message and return it.
    ///
    /// Whitespace-only text is rejected before the store is touched.
    #[instrument(name = "message_log.append", skip(self, text), fields(key = %self.key, id = tracing::field::Empty))]
    pub async fn append(&self, text: &str) -> Result<Message, LogError> {
        if text.trim().is_empty() {
            return Err(LogError::Validation("Message text cannot be empty".to_string()));
        }

        let mut message = Message {
            id: 0,
            text: text.to_string(),
            created_at: now_timestamp(),
            origin: self.origin.clone(),
        };

        let id = match self.ids {
            IdStrategy::Counter => {
                let record = numbered_record(&message)?;
                self.store
                    .push_numbered(&self.key, &self.counter_key, &record)
                    .await?
            }
            IdStrategy::Length => {
                // Not atomic: two writers can read the same length. The raw
                // length also counts entries `list_all` skips as unreadable,
                // so with any present the id runs ahead of the listed count.
                let id = self.store.len(&self.key).await? + 1;
                let record = serde_json::to_string(&Message { id, ..message.clone() })?;
                self.store.push(&self.key, record).await?;
                id
            }
        };
        message.id = id;
        tracing::Span::current().record("id", id);
        tracing::debug!(id, "Message appended");

        Ok(message)
    }

    /// Read every message, oldest first.
    #[instrument(name = "message_log.list_all", skip(self), fields(key = %self.key))]
    pub async fn list_all(&self) -> Result<Vec<Message>, LogError> {
        let records = self.store.range_all(&self.key).await?;

        let messages = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_str::<Message>(record) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping unreadable log entry");
                    None
                }
            })
            .collect();

        Ok(messages)
    }

    /// Check that the backing store answers.
    #[instrument(name = "message_log.ping", skip(self))]
    pub async fn ping(&self) -> Result<(), LogError> {
        Ok(self.store.ping().await?)
    }
}

/// `message` serialized with its id left for the store to fill in.
fn numbered_record(message: &Message) -> Result<NumberedRecord, LogError> {
    let mut fields = serde_json::to_value(message)?;
    if let Some(object) = fields.as_object_mut() {
        object.remove("id");
    }
    let body = serde_json::to_string(&fields)?;

    Ok(NumberedRecord {
        head: "{\"id\":".to_string(),
        tail: format!(",{}", body.trim_start_matches('{')),
    })
}
