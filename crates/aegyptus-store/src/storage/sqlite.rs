//! # SQLite Key/Value Store
//!
//! Persists cart values in the `cart_storage` table.
//!
//! ```text
//! cart_storage
//! ┌──────────────────────────┬──────────────────────────────┬─────────────┐
//! │ key (PK)                 │ value                        │ updated_at  │
//! ├──────────────────────────┼──────────────────────────────┼─────────────┤
//! │ cart                     │ [{"productId":1,...}]        │ 2026-...Z   │
//! │ cart:account:42          │ []                           │ 2026-...Z   │
//! └──────────────────────────┴──────────────────────────────┴─────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::KeyValueStore;
use crate::error::StoreResult;

/// Key/value store over a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    /// When `key` was last written, if it exists.
    pub async fn updated_at(&self, key: &str) -> StoreResult<Option<DateTime<Utc>>> {
        let updated: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT updated_at FROM cart_storage WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(updated)
    }

    /// All stored keys starting with `prefix`, sorted.
    pub async fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar(
            "SELECT key FROM cart_storage WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM cart_storage WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO cart_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM cart_storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, "Removed value");
        Ok(())
    }
}
