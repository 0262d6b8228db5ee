//! Contact-form submissions and the append-only [`MessageLog`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
  CONTACT_MESSAGES_KEY, Error, Result,
  json::JsonStore,
  store::{KeyValueStore, MessageLogRepository},
};

// ─── Types ───────────────────────────────────────────────────────────────────

/// A stored submission. Entries are never updated or removed once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
  /// Milliseconds since the Unix epoch at submission, bumped past the
  /// previous entry when two land in the same millisecond.
  pub id:        String,
  pub name:      String,
  pub email:     String,
  pub message:   String,
  pub timestamp: DateTime<Utc>,
  #[serde(default)]
  pub is_read:   bool,
}

/// Input to [`MessageLogRepository::append`].
/// `id`, `timestamp` and `is_read` are always set by the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMessage {
  pub name:    String,
  pub email:   String,
  pub message: String,
}

impl NewMessage {
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self { name: name.into(), email: email.into(), message: message.into() }
  }

  /// Every field must contain something other than whitespace.
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("name", &self.name),
      ("email", &self.email),
      ("message", &self.message),
    ] {
      if value.trim().is_empty() {
        return Err(Error::Validation { field });
      }
    }
    Ok(())
  }
}

// ─── Log ─────────────────────────────────────────────────────────────────────

/// Owner of the [`CONTACT_MESSAGES_KEY`] storage key.
///
/// The backend has no compare-and-swap, so appends are a read-modify-write of
/// the whole list. `append` holds an async mutex for the duration; clones
/// share the mutex.
#[derive(Debug, Clone)]
pub struct MessageLog<S> {
  store: JsonStore<S>,
  gate:  Arc<Mutex<()>>,
}

impl<S: KeyValueStore> MessageLog<S> {
  pub fn new(backend: S) -> Self {
    Self { store: JsonStore::new(backend), gate: Arc::new(Mutex::new(())) }
  }
}

/// Next time-derived id: `now` in milliseconds, or one past the highest
/// numeric id already logged, whichever is larger. When the highest id
/// cannot be incremented, `now` gets a `-n` suffix unused by the log.
fn next_id(log: &[ContactMessage], now: DateTime<Utc>) -> String {
  let now_ms = now.timestamp_millis();
  let highest = log.iter().filter_map(|m| m.id.parse::<i64>().ok()).max();
  match highest {
    Some(h) if h >= now_ms => match h.checked_add(1) {
      Some(next) => next.to_string(),
      None => (1..)
        .map(|n| format!("{now_ms}-{n}"))
        .find(|id| log.iter().all(|m| &m.id != id))
        .unwrap_or_else(|| now_ms.to_string()),
    },
    _ => now_ms.to_string(),
  }
}

impl<S: KeyValueStore> MessageLogRepository for MessageLog<S> {
  async fn append(&self, input: NewMessage) -> Result<ContactMessage> {
    input.validate()?;

    let _guard = self.gate.lock().await;

    // An unreadable log is left untouched rather than overwritten.
    let mut log: Vec<ContactMessage> =
      self.store.try_get(CONTACT_MESSAGES_KEY).await?.unwrap_or_default();

    let now = Utc::now();
    let timestamp = log.last().map_or(now, |last| last.timestamp.max(now));

    let entry = ContactMessage {
      id: next_id(&log, now),
      name: input.name,
      email: input.email,
      message: input.message,
      timestamp,
      is_read: false,
    };

    log.push(entry.clone());
    self.store.set(CONTACT_MESSAGES_KEY, &log).await?;

    tracing::info!(id = %entry.id, total = log.len(), "contact message stored");
    Ok(entry)
  }

  async fn list(&self) -> Vec<ContactMessage> {
    self.store.get(CONTACT_MESSAGES_KEY).await.unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use chrono::TimeZone;
  use serde_json::json;

  use super::*;
  use crate::memory::MemoryStore;

  fn valid(n: usize) -> NewMessage {
    NewMessage::new(
      format!("Sender {n}"),
      format!("sender{n}@example.com"),
      format!("Hello number {n}"),
    )
  }

  #[tokio::test]
  async fn empty_email_is_rejected_without_writing() {
    let backend = MemoryStore::new();
    let log = MessageLog::new(backend.clone());
    log.append(valid(1)).await.unwrap();

    let before = log.list().await.len();
    let err = log
      .append(NewMessage::new("Ann", "", "Hi"))
      .await
      .unwrap_err();

    assert!(matches!(err, Error::Validation { field: "email" }));
    assert!(err.is_validation());
    assert_eq!(log.list().await.len(), before);
  }

  #[tokio::test]
  async fn whitespace_only_counts_as_empty() {
    let log = MessageLog::new(MemoryStore::new());
    let err = log
      .append(NewMessage::new("  ", "a@b.c", "hi"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "name" }));
    assert!(log.list().await.is_empty());
  }

  #[tokio::test]
  async fn three_appends_have_unique_ids_and_ordered_timestamps() {
    let log = MessageLog::new(MemoryStore::new());
    for n in 0..3 {
      log.append(valid(n)).await.unwrap();
    }

    let messages = log.list().await;
    assert_eq!(messages.len(), 3);

    let ids: HashSet<_> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert!(messages.iter().all(|m| !m.is_read));
    assert!(messages.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(messages[2].name, "Sender 2");
  }

  #[tokio::test]
  async fn concurrent_appends_are_not_lost() {
    let log = MessageLog::new(MemoryStore::new());
    let mut handles = Vec::new();
    for n in 0..16 {
      let log = log.clone();
      handles.push(tokio::spawn(async move { log.append(valid(n)).await }));
    }
    for h in handles {
      h.await.unwrap().unwrap();
    }

    let messages = log.list().await;
    assert_eq!(messages.len(), 16);
    let ids: HashSet<_> = messages.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids.len(), 16);
  }

  #[tokio::test]
  async fn corrupt_log_is_listed_as_empty_but_never_overwritten() {
    let backend = MemoryStore::new();
    backend
      .set_item(CONTACT_MESSAGES_KEY, "[{broken".into())
      .await
      .unwrap();

    let log = MessageLog::new(backend.clone());
    assert!(log.list().await.is_empty());

    let err = log.append(valid(1)).await.unwrap_err();
    assert!(matches!(err, Error::StorageRead { .. }));
    assert_eq!(
      backend.get_item(CONTACT_MESSAGES_KEY).await.unwrap().as_deref(),
      Some("[{broken")
    );
  }

  /// Fails the next `get_item` once, then behaves like the inner store.
  #[derive(Clone, Default)]
  struct FailNextRead {
    inner: MemoryStore,
    armed: Arc<std::sync::atomic::AtomicBool>,
  }

  impl KeyValueStore for FailNextRead {
    type Error = Error;

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
      if self.armed.swap(false, std::sync::atomic::Ordering::SeqCst) {
        return Err(Error::Unavailable);
      }
      self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
      self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> { self.inner.remove_item(key).await }

    async fn keys(&self) -> Result<Vec<String>> { self.inner.keys().await }
  }

  #[tokio::test]
  async fn failed_read_does_not_drop_existing_entries() {
    let backend = FailNextRead::default();
    let log = MessageLog::new(backend.clone());
    for n in 0..3 {
      log.append(valid(n)).await.unwrap();
    }

    backend.armed.store(true, std::sync::atomic::Ordering::SeqCst);
    let err = log.append(valid(3)).await.unwrap_err();
    assert!(matches!(err, Error::StorageRead { .. }));
    assert_eq!(log.list().await.len(), 3);

    // Once reads recover, appends continue from the intact log.
    log.append(valid(4)).await.unwrap();
    assert_eq!(log.list().await.len(), 4);
  }

  #[tokio::test]
  async fn write_failure_is_reported() {
    let log = MessageLog::new(MemoryStore::with_quota(32));
    let err = log.append(valid(1)).await.unwrap_err();
    assert!(matches!(err, Error::StorageWrite { .. }));
  }

  #[tokio::test]
  async fn reads_entries_written_by_the_browser_build() {
    let backend = MemoryStore::new();
    let stored = json!([{
      "id": "1700000000000",
      "name": "Web",
      "email": "web@example.com",
      "message": "From the site",
      "timestamp": "2023-11-14T22:13:20.000Z",
      "isRead": false
    }]);
    backend
      .set_item(CONTACT_MESSAGES_KEY, stored.to_string())
      .await
      .unwrap();

    let log = MessageLog::new(backend);
    let entry = log.append(valid(2)).await.unwrap();

    let messages = log.list().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].name, "Web");
    assert!(entry.id.parse::<i64>().unwrap() > 1_700_000_000_000);
  }

  #[test]
  fn next_id_bumps_past_collisions() {
    let now = Utc.timestamp_millis_opt(5_000).unwrap();
    let existing = ContactMessage {
      id:        "5000".into(),
      name:      "a".into(),
      email:     "b".into(),
      message:   "c".into(),
      timestamp: now,
      is_read:   false,
    };
    assert_eq!(next_id(&[existing], now), "5001");
    assert_eq!(next_id(&[], now), "5000");
  }

  #[test]
  fn next_id_at_i64_max_does_not_overflow() {
    let now = Utc.timestamp_millis_opt(5_000).unwrap();
    let entry = |id: String| ContactMessage {
      id,
      name: "a".into(),
      email: "b".into(),
      message: "c".into(),
      timestamp: now,
      is_read: false,
    };

    let log = vec![entry(i64::MAX.to_string())];
    assert_eq!(next_id(&log, now), "5000-1");

    let log = vec![entry(i64::MAX.to_string()), entry("5000-1".into())];
    assert_eq!(next_id(&log, now), "5000-2");
  }
}
