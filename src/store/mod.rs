//! Backing key-value store subsystem.
//!
//! # Data Flow
//! ```text
//! MessageLog
//!     → ListStore trait (push / push_numbered / range_all / len / ping)
//!     → memory.rs (DashMap, single process)
//!     → redis.rs  (RPUSH / LRANGE / LLEN / Lua counter-and-push against a shared server)
//! ```
//!
//! # Design Decisions
//! - The seam is a named list plus a counter; nothing message-specific leaks in
//! - Values are opaque strings; serialization belongs to the caller
//! - `push_numbered` reserves the id and appends in one atomic step, so list
//!   order always matches id order
//! - Every failure maps onto one `StoreError`, which the HTTP layer reports as 503

pub mod memory;
pub mod redis;

use std::future::Future;

use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Errors raised by a backing store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Could not establish a connection.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The store accepted the connection but the command failed.
    #[error("command failed: {0}")]
    Command(String),

    /// Connect or command exceeded the configured deadline.
    #[error("timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The store is switched off (in-memory failure injection).
    #[error("store is unavailable")]
    Unavailable,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A list value with its id left open: `head`, then the id in decimal, then `tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedRecord {
    pub head: String,
    pub tail: String,
}

impl NumberedRecord {
    /// The stored value for `id`.
    pub fn render(&self, id: u64) -> String {
        format!("{}{}{}", self.head, id, self.tail)
    }
}

/// Narrow list-oriented view of a key-value store.
pub trait ListStore: Clone + Send + Sync + 'static {
    /// Append `value` to the tail of the list at `key`, returning the new length.
    fn push(&self, key: &str, value: String) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Read the whole list at `key`, head first. Missing keys read as empty.
    fn range_all(&self, key: &str) -> impl Future<Output = StoreResult<Vec<String>>> + Send;

    /// Current length of the list at `key`.
    fn len(&self, key: &str) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Atomically take the next id from the counter at `counter_key` and push
    /// `record` rendered with that id onto the list at `key`. Returns the id.
    ///
    /// A missing counter is first seeded with the current list length, so ids
    /// continue after entries written without the counter.
    fn push_numbered(
        &self,
        key: &str,
        counter_key: &str,
        record: &NumberedRecord,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Round-trip to the store.
    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;

    /// Short backend name for logs and the status endpoint.
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_record_splices_id() {
        let record = NumberedRecord {
            head: "{\"id\":".into(),
            tail: ",\"text\":\"a\"}".into(),
        };
        assert_eq!(record.render(42), r#"{"id":42,"text":"a"}"#);
    }
}
