/// Storage keys and their patterns.
pub mod keys;
/// Key-value store abstraction and backends.
pub mod kv_store;
/// Persisted value codecs and write descriptors.
pub mod models;
/// Storage error types.
pub mod storage;
