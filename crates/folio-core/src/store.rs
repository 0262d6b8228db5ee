//! Storage traits.
//!
//! [`KeyValueStore`] is the raw, string-keyed, string-valued backend
//! (implemented by `folio-store-sqlite` and [`crate::memory::MemoryStore`]).
//! The repository traits are what the viewer depends on; each repository
//! exclusively owns one storage key.

use std::future::Future;

use crate::{
  Result,
  document::PortfolioDocument,
  message::{ContactMessage, NewMessage},
};

// ─── Backend ─────────────────────────────────────────────────────────────────

/// Durable local storage with `localStorage`-like semantics: string keys,
/// string values, no cross-key transactions.
///
/// All methods return `Send` futures so a backend can be shared across tasks
/// in a multi-threaded runtime.
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the raw value stored under `key`. Returns `None` if absent.
  fn get_item<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous value.
  fn set_item<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete `key`. Deleting an absent key is not an error.
  fn remove_item<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All stored keys, sorted.
  fn keys(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}

// ─── Repositories ────────────────────────────────────────────────────────────

/// The versioned portfolio document.
pub trait DocumentRepository: Send + Sync {
  /// Return the current document, healing the stored copy if it is absent,
  /// corrupt or stamped with another version. Never fails: storage faults
  /// are logged and the in-memory default is returned.
  fn load(&self) -> impl Future<Output = PortfolioDocument> + Send + '_;

  /// Persist `document`, stamping it with the current version.
  fn save<'a>(
    &'a self,
    document: &'a PortfolioDocument,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Remove the stored document. The next [`load`](Self::load) regenerates
  /// the defaults.
  fn clear(&self) -> impl Future<Output = Result<()>> + Send + '_;
}

/// The append-only log of contact-form submissions.
pub trait MessageLogRepository: Send + Sync {
  /// Validate `input` and append it to the log.
  ///
  /// Returns [`crate::Error::Validation`] without touching storage if a field
  /// is empty.
  fn append(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<ContactMessage>> + Send + '_;

  /// All stored messages in submission order. Unreadable data reads as an
  /// empty log.
  fn list(&self) -> impl Future<Output = Vec<ContactMessage>> + Send + '_;
}
