//! In-process store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::store::{ListStore, NumberedRecord, StoreError, StoreResult};

/// A thread-safe in-memory list store.
///
/// Clones share the same maps, so one instance can be handed to the router
/// and kept by a test to inspect or break it.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    lists: Arc<DashMap<String, Vec<String>>>,
    counters: Arc<DashMap<String, u64>>,
    available: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            lists: Arc::new(DashMap::new()),
            counters: Arc::new(DashMap::new()),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`]
    /// (`false`) or succeed again (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListStore for MemoryStore {
    async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
        self.check()?;
        let mut list = self.lists.entry(key.to_string()).or_default();
        list.push(value);
        Ok(list.len() as u64)
    }

    async fn range_all(&self, key: &str) -> StoreResult<Vec<String>> {
        self.check()?;
        Ok(self
            .lists
            .get(key)
            .map(|list| list.value().clone())
            .unwrap_or_default())
    }

    async fn len(&self, key: &str) -> StoreResult<u64> {
        self.check()?;
        Ok(self.lists.get(key).map(|list| list.len() as u64).unwrap_or(0))
    }

    async fn push_numbered(
        &self,
        key: &str,
        counter_key: &str,
        record: &NumberedRecord,
    ) -> StoreResult<u64> {
        self.check()?;
        // Lock order is always list then counter; the list guard serializes
        // appends to `key` until the record is in place.
        let mut list = self.lists.entry(key.to_string()).or_default();
        let mut counter = self
            .counters
            .entry(counter_key.to_string())
            .or_insert(list.len() as u64);
        *counter += 1;
        let id = *counter;
        list.push(record.render(id));
        Ok(id)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_returns_new_length() {
        let store = MemoryStore::new();
        assert_eq!(store.push("k", "a".into()).await.unwrap(), 1);
        assert_eq!(store.push("k", "b".into()).await.unwrap(), 2);
        assert_eq!(store.range_all("k").await.unwrap(), vec!["a", "b"]);
        assert_eq!(store.len("k").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_key_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.range_all("nothing").await.unwrap().is_empty());
        assert_eq!(store.len("nothing").await.unwrap(), 0);
    }

    fn record() -> NumberedRecord {
        NumberedRecord {
            head: "#".into(),
            tail: String::new(),
        }
    }

    #[tokio::test]
    async fn test_push_numbered_counts_from_one() {
        let store = MemoryStore::new();
        assert_eq!(store.push_numbered("k", "c", &record()).await.unwrap(), 1);
        assert_eq!(store.push_numbered("k", "c", &record()).await.unwrap(), 2);
        assert_eq!(store.range_all("k").await.unwrap(), vec!["#1", "#2"]);
        assert_eq!(store.len("c").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_counter_is_seeded_from_list_length() {
        let store = MemoryStore::new();
        store.push("k", "#1".into()).await.unwrap();
        store.push("k", "#2".into()).await.unwrap();

        assert_eq!(store.push_numbered("k", "c", &record()).await.unwrap(), 3);
        assert_eq!(store.range_all("k").await.unwrap(), vec!["#1", "#2", "#3"]);
    }

    #[tokio::test]
    async fn test_existing_counter_is_not_reseeded() {
        let store = MemoryStore::new();
        store.push_numbered("k", "c", &record()).await.unwrap();
        store.push("k", "extra".into()).await.unwrap();

        assert_eq!(store.push_numbered("k", "c", &record()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.push("k", "x".into()).await.unwrap();
        assert_eq!(store.len("k").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.push("k", "kept".into()).await.unwrap();
        store.set_available(false);

        assert!(matches!(store.push("k", "x".into()).await, Err(StoreError::Unavailable)));
        assert!(matches!(store.range_all("k").await, Err(StoreError::Unavailable)));
        assert!(matches!(
            store.push_numbered("k", "c", &record()).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable)));

        store.set_available(true);
        assert_eq!(store.range_all("k").await.unwrap(), vec!["kept"]);
    }
}
