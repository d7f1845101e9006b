//! File-backed JSON value with lazy, locked initialization.
//!
//! The value is read from disk on first use (or written with its default when
//! the file does not exist yet) and cached afterwards. Every change rewrites the
//! whole file while holding the file lock, so the file always reflects the last
//! change applied in memory.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, error, info};

use crate::error::Result;

pub struct JsonFileStore<T> {
    path: PathBuf,
    label: &'static str,
    default: fn() -> T,
    value: OnceCell<RwLock<T>>,
    file_lock: Mutex<()>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Create a store for `path`. No I/O happens until the value is first used.
    pub fn new(path: impl Into<PathBuf>, label: &'static str, default: fn() -> T) -> Self {
        Self {
            path: path.into(),
            label,
            default,
            value: OnceCell::new(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current value.
    pub async fn get(&self) -> T {
        self.cell().await.read().await.clone()
    }

    /// Replace the value and persist it.
    pub async fn replace(&self, value: T) -> T {
        self.update(|current| *current = value).await
    }

    /// Change the value in place and persist it. Returns the new value.
    pub async fn update(&self, change: impl FnOnce(&mut T)) -> T {
        let cell = self.cell().await;
        let _file = self.file_lock.lock().await;

        let snapshot = {
            let mut value = cell.write().await;
            change(&mut *value);
            value.clone()
        };

        if let Err(e) = self.write_file(&snapshot).await {
            error!("Failed to save {}: {e}", self.label);
        }
        snapshot
    }

    async fn cell(&self) -> &RwLock<T> {
        self.value.get_or_init(|| async { RwLock::new(self.load().await) }).await
    }

    async fn load(&self) -> T {
        let _file = self.file_lock.lock().await;

        let value = match tokio::fs::try_exists(&self.path).await {
            Ok(true) => match self.read_file().await {
                Ok(value) => value,
                Err(e) => {
                    error!("Failed to load {}: {e}", self.label);
                    (self.default)()
                }
            },
            Ok(false) => {
                debug!("{} file missing, writing defaults to {:?}", self.label, self.path);
                let value = (self.default)();
                if let Err(e) = self.write_file(&value).await {
                    error!("Failed to save {}: {e}", self.label);
                }
                value
            }
            Err(e) => {
                error!("Failed to load {}: {e}", self.label);
                (self.default)()
            }
        };

        info!("{} initialized successfully", self.label);
        value
    }

    async fn read_file(&self) -> Result<T> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn write_file(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Prefs {
        page_size: i32,
        names: Vec<String>,
    }

    fn defaults() -> Prefs {
        Prefs {
            page_size: 10,
            names: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let store = JsonFileStore::new(&path, "Prefs", defaults);
        assert!(!path.exists());

        assert_eq!(store.get().await, defaults());
        let on_disk: Prefs = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, defaults());
    }

    #[tokio::test]
    async fn test_existing_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"pageSize": 25, "names": ["a"]}"#).unwrap();

        let store = JsonFileStore::new(&path, "Prefs", defaults);
        let prefs = store.get().await;
        assert_eq!(prefs.page_size, 25);
        assert_eq!(prefs.names, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path, "Prefs", defaults);
        assert_eq!(store.get().await, defaults());
        // The broken file is left alone until the next change.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");

        store.update(|p| p.page_size = 50).await;
        let on_disk: Prefs = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.page_size, 50);
    }

    #[tokio::test]
    async fn test_changes_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = JsonFileStore::new(&path, "Prefs", defaults);
        let updated = store.update(|p| p.names.push("EntryDate".to_string())).await;
        assert_eq!(updated.names, vec!["EntryDate".to_string()]);

        let reopened = JsonFileStore::new(&path, "Prefs", defaults);
        assert_eq!(reopened.get().await, updated);

        let replaced = reopened.replace(defaults()).await;
        assert_eq!(replaced, defaults());
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_all_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = Arc::new(JsonFileStore::new(&path, "Prefs", defaults));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.update(|p| p.names.push(format!("col{i}"))).await;
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let in_memory = store.get().await;
        assert_eq!(in_memory.names.len(), 16);
        let on_disk: Prefs = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, in_memory);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_value() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("prefs.json");
        std::fs::create_dir(&path).unwrap();

        let store = JsonFileStore::new(&path, "Prefs", defaults);
        let updated = store.update(|p| p.page_size = 99).await;
        assert_eq!(updated.page_size, 99);
        assert_eq!(store.get().await.page_size, 99);
    }
}
