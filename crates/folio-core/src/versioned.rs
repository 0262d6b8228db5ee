//! [`DocumentStore`]: the versioned portfolio document.
//!
//! The stored document is reused only when its version stamp equals
//! [`CURRENT_VERSION`] exactly. Any other stamp discards the stored copy
//! outright: there is no field-level migration, and anything customised
//! under an older version is gone once a newer build loads.

use serde_json::Value;

use crate::{
  CURRENT_VERSION, PORTFOLIO_KEY, Result,
  defaults::default_document,
  document::PortfolioDocument,
  json::JsonStore,
  store::{DocumentRepository, KeyValueStore},
};

/// Owner of the [`PORTFOLIO_KEY`] storage key.
#[derive(Debug, Clone)]
pub struct DocumentStore<S> {
  store: JsonStore<S>,
}

impl<S: KeyValueStore> DocumentStore<S> {
  pub fn new(backend: S) -> Self { Self { store: JsonStore::new(backend) } }

  /// Decode a stored value whose stamp is current. Values that do not fit
  /// the document shape count as corrupt.
  fn decode_current(raw: Value) -> Option<PortfolioDocument> {
    match serde_json::from_value::<PortfolioDocument>(raw) {
      Ok(mut doc) => {
        doc.sort_projects();
        Some(doc)
      }
      Err(e) => {
        tracing::warn!(error = %e, "stored portfolio document is malformed");
        None
      }
    }
  }

  /// Write the defaults back and hand them out, persisted or not.
  async fn regenerate(&self) -> PortfolioDocument {
    let doc = default_document();
    if let Err(e) = self.store.set(PORTFOLIO_KEY, &doc).await {
      tracing::warn!(error = %e, "continuing with unsaved default portfolio");
    }
    doc
  }
}

/// The `version` stamp of a stored value, if it has a string one.
fn version_stamp(raw: &Value) -> Option<&str> { raw.get("version")?.as_str() }

impl<S: KeyValueStore> DocumentRepository for DocumentStore<S> {
  async fn load(&self) -> PortfolioDocument {
    let Some(raw) = self.store.get::<Value>(PORTFOLIO_KEY).await else {
      tracing::debug!("no stored portfolio document; writing defaults");
      return self.regenerate().await;
    };

    let found = version_stamp(&raw).map(str::to_owned);
    if found.as_deref() == Some(CURRENT_VERSION) {
      if let Some(doc) = Self::decode_current(raw) {
        return doc;
      }
    } else {
      tracing::info!(
        found = found.as_deref().unwrap_or("<none>"),
        expected = CURRENT_VERSION,
        "portfolio version mismatch; discarding stored document"
      );
      if let Err(e) = self.store.remove(PORTFOLIO_KEY).await {
        tracing::warn!(error = %e, "could not discard stale portfolio document");
      }
    }

    self.regenerate().await
  }

  async fn save(&self, document: &PortfolioDocument) -> Result<()> {
    let mut stamped = document.clone();
    stamped.version = CURRENT_VERSION.to_owned();
    stamped.sort_projects();
    self.store.set(PORTFOLIO_KEY, &stamped).await
  }

  async fn clear(&self) -> Result<()> { self.store.remove(PORTFOLIO_KEY).await }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::memory::MemoryStore;

  async fn stored(backend: &MemoryStore) -> Option<Value> {
    JsonStore::new(backend.clone()).get(PORTFOLIO_KEY).await
  }

  async fn put(backend: &MemoryStore, value: Value) {
    backend
      .set_item(PORTFOLIO_KEY, value.to_string())
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn empty_store_yields_and_persists_defaults() {
    let backend = MemoryStore::new();
    let docs = DocumentStore::new(backend.clone());

    let doc = docs.load().await;
    assert_eq!(doc, default_document());
    assert_eq!(doc.version, CURRENT_VERSION);

    let persisted = stored(&backend).await.unwrap();
    assert_eq!(persisted, serde_json::to_value(default_document()).unwrap());
  }

  #[tokio::test]
  async fn version_mismatch_discards_and_regenerates() {
    let backend = MemoryStore::new();
    put(
      &backend,
      json!({
        "version": "1.0",
        "profile": { "name": "Customised" },
        "technologies": [],
        "projects": []
      }),
    )
    .await;

    let doc = DocumentStore::new(backend.clone()).load().await;
    assert_eq!(doc, default_document());

    let persisted = stored(&backend).await.unwrap();
    assert_eq!(persisted["version"], CURRENT_VERSION);
    assert_eq!(persisted["profile"]["name"], "Alex Vercetti");
  }

  #[tokio::test]
  async fn missing_version_counts_as_mismatch() {
    let backend = MemoryStore::new();
    put(&backend, json!({ "profile": { "name": "Nobody" } })).await;

    let doc = DocumentStore::new(backend).load().await;
    assert_eq!(doc, default_document());
  }

  #[tokio::test]
  async fn current_document_comes_back_sorted() {
    let backend = MemoryStore::new();
    put(
      &backend,
      json!({
        "version": CURRENT_VERSION,
        "profile": { "name": "Sam" },
        "technologies": [{ "name": "Rust", "icon": "Ferris" }],
        "projects": [
          { "id": "c", "order": 3, "name": "Third" },
          { "id": "a", "order": 1, "name": "First" },
          { "id": "b", "order": 2, "name": "Second" }
        ]
      }),
    )
    .await;

    let doc = DocumentStore::new(backend).load().await;
    let orders: Vec<_> = doc.projects.iter().map(|p| p.order).collect();
    assert_eq!(orders, [1, 2, 3]);
    assert_eq!(doc.profile.name.as_deref(), Some("Sam"));
  }

  #[tokio::test]
  async fn corrupt_json_is_healed() {
    let backend = MemoryStore::new();
    backend
      .set_item(PORTFOLIO_KEY, "{\"version\": \"2.0\", ".into())
      .await
      .unwrap();

    let doc = DocumentStore::new(backend.clone()).load().await;
    assert_eq!(doc, default_document());
    assert!(stored(&backend).await.is_some());
  }

  #[tokio::test]
  async fn current_stamp_with_wrong_shape_is_healed() {
    let backend = MemoryStore::new();
    put(&backend, json!({ "version": CURRENT_VERSION, "projects": "nope" })).await;

    let doc = DocumentStore::new(backend).load().await;
    assert_eq!(doc, default_document());
  }

  #[tokio::test]
  async fn write_failure_still_returns_defaults() {
    let backend = MemoryStore::with_quota(8);
    let doc = DocumentStore::new(backend.clone()).load().await;
    assert_eq!(doc, default_document());
    assert!(backend.get_item(PORTFOLIO_KEY).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn unavailable_storage_still_returns_defaults() {
    let backend = MemoryStore::new();
    backend.set_unavailable(true);
    let doc = DocumentStore::new(backend).load().await;
    assert_eq!(doc, default_document());
  }

  #[tokio::test]
  async fn save_stamps_current_version() {
    let backend = MemoryStore::new();
    let docs = DocumentStore::new(backend);

    let mut doc = default_document();
    doc.version = "0.1".into();
    doc.profile.name = Some("Renamed".into());
    docs.save(&doc).await.unwrap();

    let loaded = docs.load().await;
    assert_eq!(loaded.version, CURRENT_VERSION);
    assert_eq!(loaded.profile.name.as_deref(), Some("Renamed"));
  }

  #[tokio::test]
  async fn clear_forces_regeneration() {
    let backend = MemoryStore::new();
    let docs = DocumentStore::new(backend.clone());

    let mut doc = default_document();
    doc.profile.name = Some("Temporary".into());
    docs.save(&doc).await.unwrap();
    docs.clear().await.unwrap();
    assert!(backend.get_item(PORTFOLIO_KEY).await.unwrap().is_none());

    assert_eq!(docs.load().await, default_document());
  }
}
