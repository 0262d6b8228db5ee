//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. The `user_version` pragma stamps the
//! table layout; it is unrelated to the portfolio document's own version.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per storage key, mirroring browser localStorage.
CREATE TABLE IF NOT EXISTS items (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,   -- JSON text written by the repositories
    updated_at  TEXT NOT NULL    -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";
