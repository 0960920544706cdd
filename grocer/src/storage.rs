//! Key-value backends for the account store
//!
//! `SqliteKeyValueStore` persists the namespace in a single `kv` table.
//! Uses r2d2 connection pooling; blocking SQLite calls run on
//! `spawn_blocking` so the async trait never stalls the caller's executor.
//! `MemoryKeyValueStore` keeps everything in-process and can inject failures.

use crate::interface::{KeyValueStore, StorageError};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Global fallback Tokio runtime for when async functions are called outside any runtime context.
/// Used by UniFFI, which drives futures without a tokio reactor.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

/// Current runtime if there is one, otherwise the shared fallback
fn runtime_handle() -> tokio::runtime::Handle {
    tokio::runtime::Handle::try_current().unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLITE
// ─────────────────────────────────────────────────────────────────────────────

/// Thread-safe SQLite namespace. One row per key; every call is its own
/// statement, so writes are atomic per key and never span keys.
///
/// Cloning is cheap: clones share the connection pool.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteKeyValueStore {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;
                ",
            )?;
            Ok(())
        });

        let pool = Pool::builder().max_size(4).build(manager)?;

        let store = Self { pool };
        store.setup_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DatabaseResult<Self> {
        // In-memory needs a single connection to maintain state
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;

        let store = Self { pool };
        store.setup_schema()?;
        Ok(store)
    }

    fn get_conn(&self) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> DatabaseResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set_value(&self, key: &str, value: &str) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove_value(&self, key: &str) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Run a blocking closure against this store off the async executor
    async fn blocking<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteKeyValueStore) -> DatabaseResult<T> + Send + 'static,
    {
        let store = self.clone();
        let result = runtime_handle()
            .spawn_blocking(move || f(&store))
            .await
            .map_err(DatabaseError::from)?;
        Ok(result?)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: String) -> Result<Option<String>, StorageError> {
        self.blocking(move |db| db.get_value(&key)).await
    }

    async fn set(&self, key: String, value: String) -> Result<(), StorageError> {
        self.blocking(move |db| db.set_value(&key, &value)).await
    }

    async fn remove(&self, key: String) -> Result<(), StorageError> {
        self.blocking(move |db| db.remove_value(&key)).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IN-MEMORY
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local namespace. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_write_keys: Mutex<HashSet<String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` / `remove` fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `set` / `remove` calls on `key` alone fail
    pub fn set_fail_writes_for(&self, key: &str, fail: bool) {
        let mut keys = self.fail_write_keys.lock();
        if fail {
            keys.insert(key.to_string());
        } else {
            keys.remove(key);
        }
    }

    /// Synchronous peek, bypassing failure injection
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn check_write(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) || self.fail_write_keys.lock().contains(key) {
            return Err(StorageError::Backend("write rejected".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: String) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("read rejected".into()));
        }
        Ok(self.entries.lock().get(&key).cloned())
    }

    async fn set(&self, key: String, value: String) -> Result<(), StorageError> {
        self.check_write(&key)?;
        self.entries.lock().insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: String) -> Result<(), StorageError> {
        self.check_write(&key)?;
        self.entries.lock().remove(&key);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FFI CONSTRUCTORS
// ─────────────────────────────────────────────────────────────────────────────

/// Open (or create) a SQLite-backed namespace at `db_path`
#[uniffi::export]
pub fn open_sqlite_store(db_path: String) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    let store = SqliteKeyValueStore::open(db_path)?;
    Ok(Arc::new(store))
}

/// Fresh in-memory namespace, mainly for previews and UI tests
#[uniffi::export]
pub fn new_memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryKeyValueStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_set_get_remove() {
        let db = SqliteKeyValueStore::open_in_memory().unwrap();
        assert_eq!(db.get_value("k").unwrap(), None);

        db.set_value("k", "v1").unwrap();
        assert_eq!(db.get_value("k").unwrap().as_deref(), Some("v1"));

        db.set_value("k", "v2").unwrap();
        assert_eq!(db.get_value("k").unwrap().as_deref(), Some("v2"));

        db.remove_value("k").unwrap();
        assert_eq!(db.get_value("k").unwrap(), None);

        // Removing an absent key is not an error
        db.remove_value("k").unwrap();
    }

    #[tokio::test]
    async fn test_sqlite_trait_roundtrip_on_tokio() {
        let store = SqliteKeyValueStore::open_in_memory().unwrap();
        store.set("a".into(), "1".into()).await.unwrap();
        store.set("b".into(), "2".into()).await.unwrap();
        assert_eq!(store.get("a".into()).await.unwrap().as_deref(), Some("1"));
        store.remove("a".into()).await.unwrap();
        assert_eq!(store.get("a".into()).await.unwrap(), None);
        assert_eq!(store.get("b".into()).await.unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_sqlite_trait_works_without_external_tokio_runtime() {
        // No #[tokio::test]: this is how UniFFI drives our futures
        let store = SqliteKeyValueStore::open_in_memory().unwrap();
        let value = futures::executor::block_on(async {
            store.set("k".into(), "v".into()).await?;
            store.get("k".into()).await
        });
        assert_eq!(value.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemoryKeyValueStore::new();
        store.set("k".into(), "v".into()).await.unwrap();

        store.set_fail_reads(true);
        assert!(store.get("k".into()).await.is_err());
        store.set_fail_reads(false);

        store.set_fail_writes(true);
        assert!(store.set("k".into(), "other".into()).await.is_err());
        assert!(store.remove("k".into()).await.is_err());
        assert_eq!(store.snapshot("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_memory_store_per_key_write_failure() {
        let store = MemoryKeyValueStore::new();
        store.set_fail_writes_for("locked", true);

        assert!(store.set("locked".into(), "v".into()).await.is_err());
        assert!(store.remove("locked".into()).await.is_err());
        store.set("open".into(), "v".into()).await.unwrap();
        assert_eq!(store.snapshot("open").as_deref(), Some("v"));

        store.set_fail_writes_for("locked", false);
        store.set("locked".into(), "v".into()).await.unwrap();
        assert_eq!(store.snapshot("locked").as_deref(), Some("v"));
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("grocer.sqlite");
        let db = SqliteKeyValueStore::open(&path).unwrap();
        db.set_value("k", "v").unwrap();
        assert!(path.exists());
    }
}
