//! Error types for `folio-core`.

use thiserror::Error;

/// A boxed error coming from a storage backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// A persisted value exists but cannot be read or decoded. Repositories
  /// recover from this locally by treating the value as absent.
  #[error("stored value under {key:?} is unreadable: {reason}")]
  StorageRead { key: String, reason: String },

  /// A value could not be persisted. Callers keep working with the
  /// in-memory value.
  #[error("could not persist {key:?}: {source}")]
  StorageWrite {
    key:    String,
    #[source]
    source: BoxError,
  },

  /// A required contact-form field was left empty.
  #[error("{field} is required")]
  Validation { field: &'static str },

  /// The write would push the backend past its byte quota.
  #[error("storage quota exceeded writing {key:?}: {needed} bytes needed, quota is {quota}")]
  QuotaExceeded {
    key:    String,
    needed: usize,
    quota:  usize,
  },

  /// The backend is switched off or could not be reached.
  #[error("storage is unavailable")]
  Unavailable,

  #[error("storage backend error: {0}")]
  Backend(#[source] BoxError),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether the error is something the user can fix and retry, as opposed to
  /// a storage fault.
  pub fn is_validation(&self) -> bool { matches!(self, Self::Validation { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
