//! # Store Handle and Pool Management
//!
//! Connection pool creation and the `Store` key/value API.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App startup                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(path) ── pool settings                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config).await ── create pool + run migrations              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.read(keys::DRAFT_INVOICE, None).await                            │
//! │  store.write(keys::DRAFT_INVOICE, &invoice).await?                      │
//! │                                                                         │
//! │  The session and catalog each hold a cheap clone of the Store; all      │
//! │  clones share the same SqlitePool.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) is enabled: readers don't block the
//! writer, and an interrupted process leaves a recoverable journal - which
//! is what makes resuming an in-progress draft after a crash safe.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::migrations;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/bijak.db").max_connections(3);
/// let store = Store::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 3 (a single-user app needs very few)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    pub min_connections: u32,

    /// Connection acquire timeout.
    pub connect_timeout: Duration,

    /// Whether to run migrations on open.
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a new configuration with the given database path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 3,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Creates an in-memory store configuration (for testing).
    ///
    /// Each in-memory store is fully isolated.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // in-memory requires a single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// The key/value store handle.
///
/// Cloning is cheap (the pool is internally shared); the session manager
/// and catalog synchronizer each hold their own clone.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the store: creates the database file if needed, configures
    /// SQLite (WAL, NORMAL synchronous), builds the pool, runs migrations.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening key/value store"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            // WAL: readers never block the single writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL: durable against corruption, may lose the last write
            // on power failure - acceptable for an auto-saving draft
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let store = Store { pool };

        if config.run_migrations {
            migrations::run_migrations(&store.pool).await?;
        }

        Ok(store)
    }

    /// Reads the record at `key`, deserializing it as `T`.
    ///
    /// ## Degradation contract
    /// A missing key, an I/O failure, and a corrupt (non-deserializable)
    /// value ALL return the supplied default. Persisted-state problems
    /// must never crash a caller; they show up as a `warn!` and a fresh
    /// start for that one record.
    pub async fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let row = match sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
        {
            Ok(row) => row,
            Err(e) => {
                warn!(key = %key, error = %e, "Store read failed, using default");
                return default;
            }
        };

        let Some(row) = row else {
            debug!(key = %key, "Key not present, using default");
            return default;
        };

        let raw: String = row.get("value");
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Corrupt record, using default");
                default
            }
        }
    }

    /// Writes `value` under `key`, replacing any previous record.
    ///
    /// The write is awaited: a `read` issued after this returns observes
    /// the new value.
    pub async fn write<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        debug!(key = %key, bytes = raw.len(), "Writing record");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(raw)
        .bind(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// When `key` was last written, or `None` for a missing key.
    ///
    /// Same degradation contract as `read`: an unparsable timestamp is
    /// treated as absent, not an error.
    pub async fn last_updated(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw: Option<String> =
            match sqlx::query_scalar("SELECT updated_at FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
            {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(key = %key, error = %e, "Timestamp read failed");
                    return None;
                }
            };

        let raw = raw?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!(key = %key, error = %e, "Unparsable update timestamp");
                None
            }
        }
    }

    /// Removes the record at `key`. Removing a missing key is a no-op.
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(key = %key, "Removing record");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Checks if the store is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool. All operations fail afterwards.
    pub async fn close(&self) {
        info!("Closing store connection pool");
        self.pool.close().await;
    }

    /// Raw pool access for diagnostics and tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use bijak_core::{Customer, Invoice, LineItem};

    async fn test_store() -> Store {
        Store::open(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_returns_default() {
        let store = test_store().await;

        let customers: Vec<Customer> = store.read(keys::CUSTOMERS, Vec::new()).await;
        assert!(customers.is_empty());

        let draft: Option<Invoice> = store.read(keys::DRAFT_INVOICE, None).await;
        assert!(draft.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let store = test_store().await;

        let mut invoice = Invoice::new_draft();
        invoice.items.push(LineItem::new("Paneer", 50000, 1.0, "kg"));
        invoice.recompute_totals();
        store.write(keys::DRAFT_INVOICE, &invoice).await.unwrap();

        let back: Option<Invoice> = store.read(keys::DRAFT_INVOICE, None).await;
        let back = back.expect("draft should round-trip");
        assert_eq!(back.id, invoice.id);
        assert_eq!(back.total_cents, 50000);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let store = test_store().await;

        store.write("k", &1u32).await.unwrap();
        store.write("k", &2u32).await.unwrap();

        let v: u32 = store.read("k", 0).await;
        assert_eq!(v, 2);
    }

    #[tokio::test]
    async fn test_corrupt_value_degrades_to_default() {
        let store = test_store().await;

        // Plant a record that is not a Vec<Customer>
        sqlx::query("INSERT INTO kv_store (key, value) VALUES (?1, ?2)")
            .bind(keys::CUSTOMERS)
            .bind("{not json at all")
            .execute(store.pool())
            .await
            .unwrap();

        let customers: Vec<Customer> = store.read(keys::CUSTOMERS, Vec::new()).await;
        assert!(customers.is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = test_store().await;

        store.write("k", &42u32).await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap(); // missing key is fine

        let v: Option<u32> = store.read("k", None).await;
        assert!(v.is_none());
    }

    #[tokio::test]
    async fn test_last_updated_tracks_writes() {
        let store = test_store().await;

        assert!(store.last_updated("k").await.is_none());

        let before = chrono::Utc::now() - chrono::Duration::seconds(1);
        store.write("k", &1u32).await.unwrap();
        let first = store.last_updated("k").await.expect("stamped on write");
        assert!(first > before);

        store.write("k", &2u32).await.unwrap();
        let second = store.last_updated("k").await.unwrap();
        assert!(second >= first);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = test_store().await;

        store.write("a", &1u32).await.unwrap();
        store.write("b", &2u32).await.unwrap();
        store.remove("a").await.unwrap();

        let b: u32 = store.read("b", 0).await;
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = test_store().await;
        assert!(store.health_check().await);
    }
}
