//! [`MemoryStore`]: an in-process [`KeyValueStore`].
//!
//! Used by tests, and by the viewer as a last resort when the durable store
//! cannot be opened: the portfolio still renders, nothing survives exit.

use std::{
  collections::BTreeMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Error, Result, store::KeyValueStore};

#[derive(Debug, Default)]
struct Inner {
  items:       BTreeMap<String, String>,
  quota:       Option<usize>,
  unavailable: bool,
}

/// A map-backed store with an optional byte quota.
///
/// Cloning is cheap and clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store that rejects writes once keys plus values would exceed
  /// `bytes`.
  pub fn with_quota(bytes: usize) -> Self {
    let store = Self::default();
    store.lock().quota = Some(bytes);
    store
  }

  /// Simulate storage being switched off: every operation fails with
  /// [`Error::Unavailable`] until re-enabled.
  pub fn set_unavailable(&self, unavailable: bool) {
    self.lock().unavailable = unavailable;
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn available(&self) -> Result<MutexGuard<'_, Inner>> {
    let inner = self.lock();
    if inner.unavailable {
      return Err(Error::Unavailable);
    }
    Ok(inner)
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Error;

  async fn get_item(&self, key: &str) -> Result<Option<String>> {
    Ok(self.available()?.items.get(key).cloned())
  }

  async fn set_item(&self, key: &str, value: String) -> Result<()> {
    let mut inner = self.available()?;

    if let Some(quota) = inner.quota {
      let others: usize = inner
        .items
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
      let needed = others + key.len() + value.len();
      if needed > quota {
        return Err(Error::QuotaExceeded { key: key.to_owned(), needed, quota });
      }
    }

    inner.items.insert(key.to_owned(), value);
    Ok(())
  }

  async fn remove_item(&self, key: &str) -> Result<()> {
    self.available()?.items.remove(key);
    Ok(())
  }

  async fn keys(&self) -> Result<Vec<String>> {
    Ok(self.available()?.items.keys().cloned().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn set_get_remove() {
    let s = MemoryStore::new();
    s.set_item("a", "1".into()).await.unwrap();
    assert_eq!(s.get_item("a").await.unwrap().as_deref(), Some("1"));

    s.remove_item("a").await.unwrap();
    assert!(s.get_item("a").await.unwrap().is_none());
    // Removing again is fine.
    s.remove_item("a").await.unwrap();
  }

  #[tokio::test]
  async fn clones_share_contents() {
    let a = MemoryStore::new();
    let b = a.clone();
    a.set_item("k", "v".into()).await.unwrap();
    assert_eq!(b.keys().await.unwrap(), vec!["k".to_string()]);
  }

  #[tokio::test]
  async fn quota_counts_replacement_not_old_value() {
    let s = MemoryStore::with_quota(10);
    s.set_item("k", "123456789".into()).await.unwrap();
    // Replacing the value frees the old bytes first.
    s.set_item("k", "987654321".into()).await.unwrap();

    let err = s.set_item("j", "x".into()).await.unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded { needed: 12, quota: 10, .. }));
  }

  #[tokio::test]
  async fn unavailable_rejects_everything() {
    let s = MemoryStore::new();
    s.set_unavailable(true);
    assert!(matches!(s.get_item("k").await, Err(Error::Unavailable)));
    assert!(matches!(s.set_item("k", "v".into()).await, Err(Error::Unavailable)));

    s.set_unavailable(false);
    s.set_item("k", "v".into()).await.unwrap();
  }
}
