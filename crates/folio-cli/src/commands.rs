//! Non-interactive subcommands. Each prints to stdout and returns an error for
//! the process exit status.

use std::{fmt::Write as _, path::Path};

use anyhow::{Context as _, bail};
use clap::ValueEnum;
use folio_core::{
  document::PortfolioDocument,
  message::{ContactMessage, MessageLog, NewMessage},
  store::{DocumentRepository, KeyValueStore, MessageLogRepository},
  theme::{Theme, ThemeStore},
  versioned::DocumentStore,
};

use crate::backend::Backend;

/// Shown after a message is stored.
pub const SENT_MESSAGE: &str = "Message sent successfully! I will get back to you soon.";

/// Shown when any contact field is blank.
pub const INCOMPLETE_MESSAGE: &str = "Please fill in all fields.";

/// Shown when storing a message fails.
pub const FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
  Light,
  Dark,
  Toggle,
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub async fn send(backend: &Backend, input: NewMessage) -> anyhow::Result<()> {
  match MessageLog::new(backend.clone()).append(input).await {
    Ok(entry) => {
      println!("{SENT_MESSAGE}");
      tracing::debug!(id = %entry.id, "stored from command line");
      Ok(())
    }
    Err(e) if e.is_validation() => bail!("{INCOMPLETE_MESSAGE} ({e})"),
    Err(e) => Err(anyhow::Error::new(e).context(FAILED_MESSAGE)),
  }
}

pub async fn messages(backend: &Backend, json: bool) -> anyhow::Result<()> {
  let log = MessageLog::new(backend.clone()).list().await;

  if json {
    println!("{}", serde_json::to_string_pretty(&log)?);
  } else if log.is_empty() {
    println!("No messages.");
  } else {
    print!("{}", format_messages(&log));
  }
  Ok(())
}

fn format_messages(log: &[ContactMessage]) -> String {
  let mut out = String::new();
  for m in log {
    let _ = writeln!(
      out,
      "{}  {} <{}>{}",
      m.timestamp.format("%Y-%m-%d %H:%M:%S"),
      m.name,
      m.email,
      if m.is_read { "" } else { "  [unread]" },
    );
    for line in m.message.lines() {
      let _ = writeln!(out, "    {line}");
    }
  }
  out
}

// ─── Theme ───────────────────────────────────────────────────────────────────

pub async fn theme(backend: &Backend, choice: Option<ThemeChoice>) -> anyhow::Result<()> {
  let themes = ThemeStore::new(backend.clone());
  let current = themes.load().await;

  let next = match choice {
    None => {
      println!("{current}");
      return Ok(());
    }
    Some(ThemeChoice::Toggle) => current.toggled(),
    Some(ThemeChoice::Light) => Theme::Light,
    Some(ThemeChoice::Dark) => Theme::Dark,
  };

  themes.save(next).await.context("saving theme")?;
  println!("{next}");
  Ok(())
}

// ─── Document ────────────────────────────────────────────────────────────────

pub async fn show(backend: &Backend) -> anyhow::Result<()> {
  let doc = DocumentStore::new(backend.clone()).load().await;
  println!("{}", serde_json::to_string_pretty(&doc)?);
  Ok(())
}

pub async fn import(backend: &Backend, file: &Path) -> anyhow::Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("reading {}", file.display()))?;
  let doc: PortfolioDocument = serde_json::from_str(&raw)
    .with_context(|| format!("parsing {} as a portfolio document", file.display()))?;

  DocumentStore::new(backend.clone())
    .save(&doc)
    .await
    .context("saving portfolio document")?;

  println!(
    "Imported {} technologies and {} projects.",
    doc.technologies.len(),
    doc.projects.len()
  );
  Ok(())
}

pub async fn reset(backend: &Backend) -> anyhow::Result<()> {
  DocumentStore::new(backend.clone())
    .clear()
    .await
    .context("clearing portfolio document")?;
  println!("Portfolio reset; defaults will be restored on next load.");
  Ok(())
}

pub async fn keys(backend: &Backend) -> anyhow::Result<()> {
  for key in backend.keys().await.context("listing keys")? {
    println!("{key}");
  }
  if let Backend::Sqlite(store) = backend {
    let used = store.usage_bytes().await.context("measuring usage")?;
    match store.quota() {
      Some(quota) => eprintln!("{used} of {quota} bytes used"),
      None => eprintln!("{used} bytes used"),
    }
  }
  Ok(())
}
