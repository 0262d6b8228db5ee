//! The light/dark theme preference.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Result, THEME_KEY, json::JsonStore, store::KeyValueStore};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  pub fn toggled(self) -> Self {
    match self {
      Self::Light => Self::Dark,
      Self::Dark => Self::Light,
    }
  }

  pub fn is_dark(self) -> bool { self == Self::Dark }
}

/// Owner of the [`THEME_KEY`] storage key.
#[derive(Debug, Clone)]
pub struct ThemeStore<S> {
  store: JsonStore<S>,
}

impl<S: KeyValueStore> ThemeStore<S> {
  pub fn new(backend: S) -> Self { Self { store: JsonStore::new(backend) } }

  /// The stored theme; light when absent or unreadable.
  pub async fn load(&self) -> Theme {
    self.store.get(THEME_KEY).await.unwrap_or_default()
  }

  pub async fn save(&self, theme: Theme) -> Result<()> {
    self.store.set(THEME_KEY, &theme).await
  }

  /// Flip `current` and persist the result. On a write error the caller
  /// should keep `current.toggled()` in memory.
  pub async fn toggle(&self, current: Theme) -> Result<Theme> {
    let next = current.toggled();
    self.save(next).await?;
    Ok(next)
  }
}
