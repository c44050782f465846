use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{self, BoxFuture};

use crate::dao::{kv_store::KeyValueStore, storage::StorageResult};

/// Process-local store backed by a concurrent map. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (key, value) in entries {
            store.entries.insert(key.into(), value.into());
        }
        store
    }

    /// Synchronous read used by tests and diagnostics.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        Box::pin(future::ready(Ok(self.peek(key))))
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        self.entries.insert(key.to_string(), value);
        Box::pin(future::ready(Ok(())))
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        self.entries.remove(key);
        Box::pin(future::ready(Ok(())))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(future::ready(Ok(())))
    }

    fn is_durable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", "1".into()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::with_entries([("k", "v")]);
        let clone = store.clone();
        assert_eq!(clone.peek("k").as_deref(), Some("v"));
        assert_eq!(clone.len(), 1);
    }
}
