use std::{io, sync::Arc};

use futures::future::{self, BoxFuture};

use crate::dao::{
    kv_store::{KeyValueStore, memory::MemoryStore},
    storage::{StorageError, StorageResult},
};

/// Store refusing every operation on keys matched by `rejects`. Other keys go
/// to an inner [`MemoryStore`]. The health check fails when the empty key is
/// rejected.
#[derive(Clone)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    rejects: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl FailingStore {
    /// Refuse everything.
    pub(crate) fn unreachable() -> Self {
        Self::rejecting(|_| true)
    }

    pub(crate) fn rejecting(rejects: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            inner: MemoryStore::new(),
            rejects: Arc::new(rejects),
        }
    }

    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn refusal<T: Send + 'static>(key: &str) -> BoxFuture<'static, StorageResult<T>> {
        let err = StorageError::unavailable(
            format!("`{key}` refused"),
            io::Error::new(io::ErrorKind::PermissionDenied, "store offline"),
        );
        Box::pin(future::ready(Err(err)))
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        if (self.rejects)(key) {
            return Self::refusal(key);
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        if (self.rejects)(key) {
            return Self::refusal(key);
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        if (self.rejects)(key) {
            return Self::refusal(key);
        }
        self.inner.remove(key)
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        if (self.rejects)("") {
            return Self::refusal("health check");
        }
        self.inner.health_check()
    }
}
