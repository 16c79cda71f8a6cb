//! Fragment cache
//!
//! Caches the code extracted for each (task, language) pair so repeated
//! comparisons skip the fetch and the scan. A stored empty fragment records
//! that the language has no code on that task. Entries expire passively:
//! they stay in the table but are ignored once past their expiry time.

mod schema;

pub use schema::SCHEMA;

use crate::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Build the cache key for a task and language
pub fn cache_key(task: &str, language: &str) -> String {
    format!("{}::{}", task, language)
}

/// Trait for fragment caches
pub trait FragmentCache: Send + Sync {
    /// Look up a fragment; `Some("")` is a cached negative result
    fn get(&self, task: &str, language: &str) -> Result<Option<String>>;

    /// Store a fragment, replacing any previous value for the key
    fn put(&self, task: &str, language: &str, markup: &str, ttl: Duration) -> Result<()>;

    /// Remove every entry, returning how many were removed
    fn clear(&self) -> Result<usize>;

    /// Count live and expired entries
    fn stats(&self) -> Result<CacheStats>;
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub live: usize,
    pub expired: usize,
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether fragments are cached at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Database file; defaults to the user cache directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Time-to-live for every entry, in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: None,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Database path, falling back to `<cache dir>/sidebyside/fragments.db`
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(crate::APP_NAME)
                .join("fragments.db")
        })
    }
}

/// Open the configured cache, degrading to [`NoCache`] when it is disabled or unreachable
pub fn open_cache(config: &CacheConfig) -> Arc<dyn FragmentCache> {
    if !config.enabled {
        tracing::debug!("Fragment cache disabled");
        return Arc::new(NoCache);
    }

    let path = config.resolved_path();
    match SqliteCache::open(&path) {
        Ok(cache) => {
            tracing::debug!("Fragment cache at {:?}", path);
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!("Fragment cache unavailable, continuing without it: {}", e);
            Arc::new(NoCache)
        }
    }
}

/// SQLite-backed fragment cache
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Open or create a cache database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Cache(format!("failed to create {:?}: {}", parent, e)))?;
        }

        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open an in-memory cache (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Cache("connection lock poisoned".to_string()))
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl FragmentCache for SqliteCache {
    fn get(&self, task: &str, language: &str) -> Result<Option<String>> {
        let markup = self
            .conn()?
            .query_row(
                "SELECT markup FROM fragments WHERE key = ?1 AND expires_at > ?2",
                params![cache_key(task, language), now()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(markup)
    }

    fn put(&self, task: &str, language: &str, markup: &str, ttl: Duration) -> Result<()> {
        let created_at = now();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = created_at.saturating_add(ttl_secs);

        self.conn()?.execute(
            r#"
            INSERT OR REPLACE INTO fragments (key, task, language, markup, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                cache_key(task, language),
                task,
                language,
                markup,
                created_at,
                expires_at
            ],
        )?;

        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        Ok(self.conn()?.execute("DELETE FROM fragments", [])?)
    }

    fn stats(&self) -> Result<CacheStats> {
        let conn = self.conn()?;
        let now = now();

        let live: i64 = conn.query_row(
            "SELECT COUNT(*) FROM fragments WHERE expires_at > ?1",
            params![now],
            |row| row.get(0),
        )?;
        let expired: i64 = conn.query_row(
            "SELECT COUNT(*) FROM fragments WHERE expires_at <= ?1",
            params![now],
            |row| row.get(0),
        )?;

        Ok(CacheStats {
            live: live as usize,
            expired: expired as usize,
        })
    }
}

/// Cache that stores nothing
pub struct NoCache;

impl FragmentCache for NoCache {
    fn get(&self, _task: &str, _language: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn put(&self, _task: &str, _language: &str, _markup: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        Ok(0)
    }

    fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::default())
    }
}
