//! The storage backend the binary runs against.
//!
//! The SQLite file is preferred; if it cannot be opened the binary keeps
//! working against process memory, so nothing persists past exit.

use folio_core::{memory::MemoryStore, store::KeyValueStore};
use folio_store_sqlite::SqliteStore;

use crate::config::FolioConfig;

#[derive(Clone)]
pub enum Backend {
  Sqlite(SqliteStore),
  Memory(MemoryStore),
}

impl Backend {
  /// Open the configured SQLite store, falling back to memory.
  pub async fn open(cfg: &FolioConfig) -> Self {
    if let Some(parent) = cfg.store_path.parent()
      && let Err(e) = std::fs::create_dir_all(parent)
    {
      tracing::warn!(path = ?parent, error = %e, "could not create store directory");
    }

    match SqliteStore::open(&cfg.store_path).await {
      Ok(store) => {
        tracing::debug!(path = ?cfg.store_path, "opened store");
        Self::Sqlite(store.with_quota(cfg.quota_bytes))
      }
      Err(e) => {
        tracing::warn!(
          path = ?cfg.store_path,
          error = %e,
          "durable storage unavailable; changes will not persist"
        );
        Self::Memory(MemoryStore::with_quota(cfg.quota_bytes))
      }
    }
  }

  pub fn is_durable(&self) -> bool { matches!(self, Self::Sqlite(_)) }
}

fn backend_error(e: folio_store_sqlite::Error) -> folio_core::Error {
  match e {
    folio_store_sqlite::Error::Core(core) => core,
    other => folio_core::Error::Backend(Box::new(other)),
  }
}

impl KeyValueStore for Backend {
  type Error = folio_core::Error;

  async fn get_item(&self, key: &str) -> folio_core::Result<Option<String>> {
    match self {
      Self::Sqlite(s) => s.get_item(key).await.map_err(backend_error),
      Self::Memory(m) => m.get_item(key).await,
    }
  }

  async fn set_item(&self, key: &str, value: String) -> folio_core::Result<()> {
    match self {
      Self::Sqlite(s) => s.set_item(key, value).await.map_err(backend_error),
      Self::Memory(m) => m.set_item(key, value).await,
    }
  }

  async fn remove_item(&self, key: &str) -> folio_core::Result<()> {
    match self {
      Self::Sqlite(s) => s.remove_item(key).await.map_err(backend_error),
      Self::Memory(m) => m.remove_item(key).await,
    }
  }

  async fn keys(&self) -> folio_core::Result<Vec<String>> {
    match self {
      Self::Sqlite(s) => s.keys().await.map_err(backend_error),
      Self::Memory(m) => m.keys().await,
    }
  }
}
