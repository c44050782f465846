#[cfg(test)]
pub(crate) mod failing;
#[cfg(feature = "file-store")]
pub mod file;
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

/// String key-value capability the progression engine persists through.
///
/// The engine decides what keys and values mean; implementations only move
/// strings in and out of their backing medium.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>>;
    /// Verify the backend is usable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Whether values outlive the process.
    fn is_durable(&self) -> bool {
        true
    }
}
