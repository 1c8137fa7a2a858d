//! Key-value store for site preferences
//!
//! This module provides a small, type-safe key-value store using sled.
//! Values are stored as JSON; keys can be scoped (`local:theme`).

use serde::{de::DeserializeOwned, Serialize};
use sled::Db;
use std::sync::Arc;
use thiserror::Error;

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Flush interval in milliseconds (None for immediate flush)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "logovo_kv.db".to_string(),
            cache_capacity: 1024 * 1024, // 1MB, a handful of flags
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Key-value store implementation
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Db>,
    separator: &'static str,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").field("keys", &self.db.len()).finish()
    }
}

impl KvStore {
    /// Create a new key-value store with configuration
    pub fn new(config: KvConfig) -> Result<Self> {
        let mut db_config = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression);

        if let Some(ms) = config.flush_every_ms {
            db_config = db_config.flush_every_ms(Some(ms));
        }

        let db = db_config.open()?;
        tracing::debug!(path = %config.path, "Opened key-value store");

        Ok(Self { db: Arc::new(db), separator: ":" })
    }

    /// Create an in-memory key-value store
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;

        Ok(Self { db: Arc::new(db), separator: ":" })
    }

    fn check_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("empty key".to_string()));
        }
        Ok(())
    }

    /// Get a value by key
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        Self::check_key(key)?;
        match self.db.get(key.as_bytes())? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Get a value by scoped key (e.g., ["local", "theme"])
    pub fn get_scoped<T>(&self, scopes: &[&str]) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = scopes.join(self.separator);
        self.get(&key)
    }

    /// Set a value by key
    pub fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        Self::check_key(key)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    /// Set a value by scoped key (e.g., ["local", "theme"], value)
    pub fn set_scoped<T>(&self, scopes: &[&str], value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let key = scopes.join(self.separator);
        self.set(&key, value)
    }

    /// Remove a value by key
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(key.as_bytes())?.is_some())
    }

    /// Remove a value by scoped key
    pub fn remove_scoped(&self, scopes: &[&str]) -> Result<bool> {
        let key = scopes.join(self.separator);
        self.remove(&key)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// Browser-style local storage, every key under the `local` scope
#[derive(Debug, Clone)]
pub struct LocalStore {
    kv: KvStore,
}

impl LocalStore {
    /// Wrap a key-value store
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Get a local value
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.kv.get_scoped(&["local", key])
    }

    /// Set a local value
    pub fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.kv.set_scoped(&["local", key], value)
    }

    /// Remove a local value
    pub fn remove(&self, key: &str) -> Result<bool> {
        self.kv.remove_scoped(&["local", key])
    }

    /// Flush pending writes
    pub fn flush(&self) -> Result<()> {
        self.kv.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_kv_store_creation() {
        let store = KvStore::in_memory().unwrap();
        assert_eq!(store.get::<String>("local:theme").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let store = KvStore::in_memory().unwrap();
        store.set("test_key", &"test_value").unwrap();

        let value: Option<String> = store.get("test_key").unwrap();
        assert_eq!(value, Some("test_value".to_string()));
    }

    #[test]
    fn test_set_and_get_struct() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Banner {
            dismissed: bool,
            version: u32,
        }

        let store = KvStore::in_memory().unwrap();
        let banner = Banner { dismissed: true, version: 3 };
        store.set("banner", &banner).unwrap();

        let loaded: Option<Banner> = store.get("banner").unwrap();
        assert_eq!(loaded, Some(banner));
    }

    #[test]
    fn test_get_nonexistent() {
        let store = KvStore::in_memory().unwrap();
        let value: Option<String> = store.get("nonexistent").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_empty_key_rejected() {
        let store = KvStore::in_memory().unwrap();
        assert!(matches!(store.set("", &1), Err(KvError::InvalidKey(_))));
        assert!(matches!(store.get::<i32>(""), Err(KvError::InvalidKey(_))));
    }

    #[test]
    fn test_remove() {
        let store = KvStore::in_memory().unwrap();
        store.set("key", &"value").unwrap();

        assert!(store.remove("key").unwrap());
        assert_eq!(store.get::<String>("key").unwrap(), None);
        assert!(!store.remove("key").unwrap());
    }

    #[test]
    fn test_scoped_operations() {
        let store = KvStore::in_memory().unwrap();
        store.set_scoped(&["local", "theme"], &"dark").unwrap();

        let value: Option<String> = store.get("local:theme").unwrap();
        assert_eq!(value, Some("dark".to_string()));
        assert!(store.remove_scoped(&["local", "theme"]).unwrap());
    }

    #[test]
    fn test_local_scope_is_shared_with_the_raw_store() {
        let store = KvStore::in_memory().unwrap();
        let local = LocalStore::new(store.clone());
        local.set("theme", &"dark").unwrap();

        assert_eq!(store.get::<String>("local:theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get::<String>("theme").unwrap(), None);
    }

    #[test]
    fn test_local_store() {
        let local = LocalStore::new(KvStore::in_memory().unwrap());
        local.set("theme", &"light").unwrap();

        assert_eq!(local.get::<String>("theme").unwrap().as_deref(), Some("light"));
        assert!(local.remove("theme").unwrap());
        assert_eq!(local.get::<String>("theme").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv").to_string_lossy().into_owned();

        {
            let store = KvStore::new(KvConfig::new(&path).flush_every_ms(None)).unwrap();
            store.set("theme", &"light").unwrap();
            store.flush().unwrap();
        }

        let store = KvStore::new(KvConfig::new(&path)).unwrap();
        assert_eq!(store.get::<String>("theme").unwrap().as_deref(), Some("light"));
    }
}
