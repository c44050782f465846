use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::{fs, sync::Mutex};
use tracing::{info, warn};

use crate::dao::{
    kv_store::{KeyValueStore, memory::MemoryStore},
    storage::{StorageError, StorageResult},
};

/// Open the document at `path`, falling back to a [`MemoryStore`] when the
/// location is unusable so the game still starts.
pub async fn open_or_memory(path: impl Into<PathBuf>) -> Arc<dyn KeyValueStore> {
    let path = path.into();
    match FileStore::open(path.clone()).await {
        Ok(store) => {
            info!(path = %path.display(), "using file-backed key-value store");
            Arc::new(store)
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "key-value document unavailable; progress is kept in memory only"
            );
            Arc::new(MemoryStore::new())
        }
    }
}

/// Store keeping every key in a single JSON object on disk.
///
/// The whole document is cached in memory and rewritten on each mutation via a
/// sibling temporary file followed by a rename, so a crash never leaves a
/// half-written document behind.
#[derive(Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open the document at `path`, starting empty when it is missing or unreadable.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| {
                StorageError::unavailable(format!("creating {}", parent.display()), source)
            })?;
        }

        let entries = match fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => {
                    info!(path = %path.display(), keys = entries.len(), "loaded key-value document");
                    entries
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "key-value document is corrupt; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no key-value document yet; starting empty");
                BTreeMap::new()
            }
            Err(err) => {
                return Err(StorageError::unavailable(
                    format!("reading {}", path.display()),
                    err,
                ));
            }
        };

        Ok(Self {
            path: Arc::new(path),
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let location = self.path.display().to_string();
        let body = serde_json::to_string_pretty(entries)
            .map_err(|source| StorageError::corrupt(location.clone(), source))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)
            .await
            .map_err(|source| StorageError::unavailable(format!("writing {location}"), source))?;
        fs::rename(&tmp, self.path.as_ref())
            .await
            .map_err(|source| StorageError::unavailable(format!("replacing {location}"), source))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        let key = key.to_string();
        Box::pin(async move {
            let guard = store.entries.lock().await;
            Ok(guard.get(&key).cloned())
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut guard = store.entries.lock().await;
            guard.insert(key, value);
            store.persist(&guard).await
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut guard = store.entries.lock().await;
            if guard.remove(&key).is_none() {
                return Ok(());
            }
            store.persist(&guard).await
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) else {
                return Ok(());
            };
            fs::metadata(parent)
                .await
                .map(|_| ())
                .map_err(|source| {
                    StorageError::unavailable(format!("checking {}", parent.display()), source)
                })
        })
    }
}
