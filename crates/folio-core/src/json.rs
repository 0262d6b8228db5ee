//! [`JsonStore`]: typed JSON values over a raw [`KeyValueStore`].
//!
//! Reads fail open: anything unreadable is logged and reported as absent, so
//! callers fall back to defaults. Writes report failure but never panic; the
//! caller keeps its in-memory value.

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, store::KeyValueStore};

/// JSON (de)serialization on top of a [`KeyValueStore`].
///
/// Cloning is as cheap as cloning the backend.
#[derive(Debug, Clone)]
pub struct JsonStore<S> {
  backend: S,
}

impl<S: KeyValueStore> JsonStore<S> {
  pub fn new(backend: S) -> Self { Self { backend } }

  pub fn backend(&self) -> &S { &self.backend }

  /// Read and decode the value under `key`, distinguishing absent
  /// (`Ok(None)`) from unreadable (`Err(Error::StorageRead)`).
  pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
    let raw = self
      .backend
      .get_item(key)
      .await
      .map_err(|e| Error::StorageRead { key: key.to_owned(), reason: e.to_string() })?;

    raw
      .map(|s| {
        serde_json::from_str(&s)
          .map_err(|e| Error::StorageRead { key: key.to_owned(), reason: e.to_string() })
      })
      .transpose()
  }

  /// Read and decode the value under `key`. Unreadable values are logged and
  /// read as absent.
  pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    match self.try_get(key).await {
      Ok(value) => value,
      Err(e) => {
        tracing::warn!(key, error = %e, "treating unreadable stored value as absent");
        None
      }
    }
  }

  /// Encode `value` and store it under `key`.
  pub async fn set<T>(&self, key: &str, value: &T) -> Result<()>
  where
    T: Serialize + Sync + ?Sized,
  {
    let encoded = serde_json::to_string(value)?;
    self.backend.set_item(key, encoded).await.map_err(|e| {
      tracing::error!(key, error = %e, "failed to persist value");
      Error::StorageWrite { key: key.to_owned(), source: Box::new(e) }
    })
  }

  pub async fn remove(&self, key: &str) -> Result<()> {
    self.backend.remove_item(key).await.map_err(|e| {
      tracing::error!(key, error = %e, "failed to remove value");
      Error::StorageWrite { key: key.to_owned(), source: Box::new(e) }
    })
  }

  pub async fn keys(&self) -> Result<Vec<String>> {
    self
      .backend
      .keys()
      .await
      .map_err(|e| Error::Backend(Box::new(e)))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};

  use super::*;
  use crate::{
    PORTFOLIO_KEY,
    defaults::default_document,
    document::PortfolioDocument,
    memory::MemoryStore,
  };

  #[tokio::test]
  async fn document_round_trips_deep_equal() {
    let store = JsonStore::new(MemoryStore::new());
    let doc = default_document();

    store.set(PORTFOLIO_KEY, &doc).await.unwrap();
    let back: PortfolioDocument = store.get(PORTFOLIO_KEY).await.unwrap();
    assert_eq!(back, doc);
  }

  #[tokio::test]
  async fn arbitrary_json_round_trips() {
    let store = JsonStore::new(MemoryStore::new());
    let value = json!({
      "nested": { "list": [1, 2.5, null, true, "s"], "empty": {} },
      "unicode": "naïve ☕",
      "negative": -42
    });

    store.set("blob", &value).await.unwrap();
    let back: Value = store.get("blob").await.unwrap();
    assert_eq!(back, value);
  }

  #[tokio::test]
  async fn missing_key_is_none() {
    let store = JsonStore::new(MemoryStore::new());
    assert!(store.get::<Value>("nope").await.is_none());
    assert!(store.try_get::<Value>("nope").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn corrupt_value_reads_as_absent() {
    let backend = MemoryStore::new();
    backend.set_item("blob", "{not json".into()).await.unwrap();
    let store = JsonStore::new(backend);

    assert!(store.get::<Value>("blob").await.is_none());
    assert!(matches!(
      store.try_get::<Value>("blob").await,
      Err(Error::StorageRead { .. })
    ));
  }

  #[tokio::test]
  async fn unavailable_backend_reads_as_absent() {
    let backend = MemoryStore::new();
    backend.set_item("blob", "1".into()).await.unwrap();
    backend.set_unavailable(true);
    let store = JsonStore::new(backend);

    assert!(store.get::<Value>("blob").await.is_none());
  }

  #[tokio::test]
  async fn quota_failure_is_a_write_error() {
    let store = JsonStore::new(MemoryStore::with_quota(16));
    let err = store.set("blob", &"x".repeat(64)).await.unwrap_err();
    assert!(matches!(err, Error::StorageWrite { .. }));
    assert!(store.get::<String>("blob").await.is_none());
  }
}
