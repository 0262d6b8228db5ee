//! Core types and storage abstractions for Folio, a locally-persisted
//! personal portfolio.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! Backends implement [`store::KeyValueStore`]; everything else in the
//! workspace talks to the typed repositories built on top of it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod defaults;
pub mod document;
pub mod error;
pub mod json;
pub mod memory;
pub mod message;
pub mod reveal;
pub mod store;
pub mod theme;
pub mod versioned;

pub use error::{Error, Result};

/// Storage key holding the versioned [`document::PortfolioDocument`].
pub const PORTFOLIO_KEY: &str = "portfolio_data";

/// Storage key holding the append-only list of
/// [`message::ContactMessage`]s.
pub const CONTACT_MESSAGES_KEY: &str = "contact_messages";

/// Storage key holding the [`theme::Theme`] preference.
pub const THEME_KEY: &str = "theme";

/// Schema version the running build expects. Bump to force every stored
/// document to be discarded and regenerated from the defaults.
pub const CURRENT_VERSION: &str = "2.0";
