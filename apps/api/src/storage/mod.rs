//! Key-value storage behind a narrow trait, mirroring the fixed-key store
//! the browser surface uses. The server side persists to a single JSON file.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

pub mod handlers;

/// Fixed key set. Nothing else is ever stored.
pub mod keys {
    pub const BASE_RESUME: &str = "base_resume";
    pub const SETTINGS: &str = "settings";
    pub const APPLIED_VACANCIES: &str = "applied_vacancies";
    pub const DAILY_COUNTER: &str = "daily_apply_counter";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The storage seam. Values are raw JSON so the trait stays object-safe;
/// typed access goes through the free helpers below.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set_raw(&self, key: &str, value: Value) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}

pub async fn get_typed<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get_raw(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn set_typed<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    store.set_raw(key, serde_json::to_value(value)?).await
}

/// JSON-file-backed store. The whole map lives in memory and is rewritten on
/// every mutation; the data set is a handful of user-scale keys.
pub struct JsonFileStore {
    path: Option<PathBuf>,
    map: Mutex<HashMap<String, Value>>,
}

impl JsonFileStore {
    /// Opens (or initializes) the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let map = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            map: Mutex::new(map),
        })
    }

    /// Ephemeral store for tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            map: Mutex::new(HashMap::new()),
        }
    }

    async fn persist(&self, map: &HashMap<String, Value>) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut map = self.map.lock().await;
        map.insert(key.to_string(), value);
        self.persist(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock().await;
        map.remove(key);
        self.persist(&map).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut map = self.map.lock().await;
        map.clear();
        self.persist(&map).await
    }
}

/// Records a submitted application: appends the vacancy id to the applied
/// list (deduplicated) and bumps today's counter.
pub async fn record_application(
    store: &dyn KeyValueStore,
    vacancy_id: &str,
) -> Result<(), StorageError> {
    let mut applied: Vec<String> = get_typed(store, keys::APPLIED_VACANCIES)
        .await?
        .unwrap_or_default();
    if !applied.iter().any(|id| id == vacancy_id) {
        applied.push(vacancy_id.to_string());
        set_typed(store, keys::APPLIED_VACANCIES, &applied).await?;
    }

    let today = Utc::now().date_naive().to_string();
    let mut counters: HashMap<String, u32> = get_typed(store, keys::DAILY_COUNTER)
        .await?
        .unwrap_or_default();
    *counters.entry(today).or_insert(0) += 1;
    set_typed(store, keys::DAILY_COUNTER, &counters).await
}

/// Number of applications recorded today.
pub async fn applications_today(store: &dyn KeyValueStore) -> Result<u32, StorageError> {
    let counters: HashMap<String, u32> = get_typed(store, keys::DAILY_COUNTER)
        .await?
        .unwrap_or_default();
    let today = Utc::now().date_naive().to_string();
    Ok(counters.get(&today).copied().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove_roundtrip() {
        let store = JsonFileStore::in_memory();
        store
            .set_raw("settings", json!({"model": "m"}))
            .await
            .unwrap();
        assert_eq!(
            store.get_raw("settings").await.unwrap(),
            Some(json!({"model": "m"}))
        );

        store.remove("settings").await.unwrap();
        assert_eq!(store.get_raw("settings").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_wipes_everything() {
        let store = JsonFileStore::in_memory();
        store.set_raw("a", json!(1)).await.unwrap();
        store.set_raw("b", json!(2)).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.get_raw("a").await.unwrap(), None);
        assert_eq!(store.get_raw("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store
                .set_raw(keys::BASE_RESUME, json!({"title": "Dev"}))
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get_raw(keys::BASE_RESUME).await.unwrap(),
            Some(json!({"title": "Dev"}))
        );
    }

    #[tokio::test]
    async fn test_record_application_dedupes_and_counts() {
        let store = JsonFileStore::in_memory();
        record_application(&store, "v-1").await.unwrap();
        record_application(&store, "v-1").await.unwrap();
        record_application(&store, "v-2").await.unwrap();

        let applied: Vec<String> = get_typed(&store, keys::APPLIED_VACANCIES)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(applied, vec!["v-1", "v-2"]);

        // Counter counts attempts, including the duplicate submission.
        assert_eq!(applications_today(&store).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_key_is_none_not_error() {
        let store = JsonFileStore::in_memory();
        let value: Option<Vec<String>> = get_typed(&store, "nothing").await.unwrap();
        assert!(value.is_none());
    }
}
