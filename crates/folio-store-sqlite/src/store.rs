//! [`SqliteStore`]: the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use chrono::Utc;
use folio_core::store::KeyValueStore;
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

/// Bytes counted against the quota for every row.
const USAGE_SQL: &str = "
SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
FROM items";

/// Bytes counted against the quota for every row except `?1`.
const USAGE_EXCLUDING_SQL: &str = "
SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
FROM items
WHERE key != ?1";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  quota: Option<usize>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, quota: None };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, quota: None };
    store.init_schema().await?;
    Ok(store)
  }

  /// Reject writes that would take keys plus values past `bytes`, the way
  /// browsers cap `localStorage`.
  pub fn with_quota(mut self, bytes: usize) -> Self {
    self.quota = Some(bytes);
    self
  }

  pub fn quota(&self) -> Option<usize> { self.quota }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Total bytes of keys and values currently stored.
  pub async fn usage_bytes(&self) -> Result<usize> {
    let used: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(USAGE_SQL, [], |r| r.get(0))?)
      })
      .await?;
    Ok(usize::try_from(used).unwrap_or_default())
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteStore {
  type Error = Error;

  async fn get_item(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();

    let value = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM items WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(value)
  }

  async fn set_item(&self, key: &str, value: String) -> Result<()> {
    let key_str = key.to_owned();
    let at_str  = Utc::now().to_rfc3339();
    let quota   = self.quota;

    // Returns the bytes the write would need when it is over quota.
    let rejected: Option<usize> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if let Some(quota) = quota {
          let others: i64 =
            tx.query_row(USAGE_EXCLUDING_SQL, rusqlite::params![key_str], |r| r.get(0))?;
          let needed =
            usize::try_from(others).unwrap_or_default() + key_str.len() + value.len();
          if needed > quota {
            return Ok(Some(needed));
          }
        }

        tx.execute(
          "INSERT INTO items (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                          updated_at = excluded.updated_at",
          rusqlite::params![key_str, value, at_str],
        )?;
        tx.commit()?;
        Ok(None)
      })
      .await?;

    match (rejected, self.quota) {
      (Some(needed), Some(quota)) => {
        tracing::warn!(key, needed, quota, "write rejected: storage quota exceeded");
        Err(Error::Core(folio_core::Error::QuotaExceeded {
          key: key.to_owned(),
          needed,
          quota,
        }))
      }
      _ => Ok(()),
    }
  }

  async fn remove_item(&self, key: &str) -> Result<()> {
    let key = key.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM items WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn keys(&self) -> Result<Vec<String>> {
    let keys = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT key FROM items ORDER BY key")?;
        let rows = stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(keys)
  }
}
