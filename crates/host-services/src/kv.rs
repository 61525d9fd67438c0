//! JSON-file key/value store
//!
//! The whole store is one JSON object on disk. It is read lazily on first
//! access, kept in memory, and rewritten after every change.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use node_engine::{HostError, HostResult, KeyValueStore};

pub struct JsonFileStore {
    path: PathBuf,
    /// `None` until the file has been read
    entries: Mutex<Option<Map<String, Value>>>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            entries: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> HostResult<Map<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) | Err(_) => {
                    log::warn!("Store file {:?} is not a JSON object; starting empty", self.path);
                    Ok(Map::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(HostError::failed(format!("read {:?}: {}", self.path, e))),
        }
    }

    async fn write_file(&self, entries: &Map<String, Value>) -> HostResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HostError::failed(format!("create {:?}: {}", parent, e)))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| HostError::failed(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| HostError::failed(format!("write {:?}: {}", tmp, e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| HostError::failed(format!("rename {:?}: {}", self.path, e)))
    }

    /// Run `f` over the loaded entries; persist when it reports a change
    async fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut Map<String, Value>) -> (T, bool),
    ) -> HostResult<T> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.read_file().await?);
        }
        let Some(entries) = guard.as_mut() else {
            return Err(HostError::failed("store not loaded"));
        };
        let (result, changed) = f(entries);
        if changed {
            self.write_file(entries).await?;
        }
        Ok(result)
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> HostResult<Option<Value>> {
        self.with_entries(|entries| (entries.get(key).cloned(), false))
            .await
    }

    async fn set(&self, key: &str, value: Value) -> HostResult<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value);
            ((), true)
        })
        .await
    }

    async fn remove(&self, key: &str) -> HostResult<()> {
        self.with_entries(|entries| {
            let existed = entries.remove(key).is_some();
            ((), existed)
        })
        .await
    }
}
