//! Runtime configuration, layered from an optional TOML file and `FOLIO_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Default byte quota, matching the common browser `localStorage` cap.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path:  PathBuf,
  /// Upper bound on stored keys plus values, in bytes.
  pub quota_bytes: usize,
  /// Log file for the full-screen viewer; logging is off there when unset.
  pub log_path:    Option<PathBuf>,
}

impl Default for FolioConfig {
  fn default() -> Self {
    Self {
      store_path:  PathBuf::from("~/.local/share/folio/folio.db"),
      quota_bytes: DEFAULT_QUOTA_BYTES,
      log_path:    None,
    }
  }
}

impl FolioConfig {
  /// Read `file` (if it exists), then the environment, over the defaults.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("FOLIO"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: FolioConfig = settings
      .try_deserialize()
      .context("failed to deserialise FolioConfig")?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.log_path = cfg.log_path.as_deref().map(expand_tilde);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
