//! SQL schema for the squall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per contact identity. Re-subscribing replaces the row that shares
-- the email or the phone number; NULLs never collide under UNIQUE.
CREATE TABLE IF NOT EXISTS subscribers (
    subscriber_id TEXT PRIMARY KEY,
    email         TEXT UNIQUE,
    phone         TEXT UNIQUE,
    city          TEXT NOT NULL,
    alert_types   TEXT NOT NULL DEFAULT '[]',  -- JSON array of tag strings
    created_at    TEXT NOT NULL,               -- ISO 8601 UTC
    CHECK (email IS NOT NULL OR phone IS NOT NULL),
    CHECK (city != '')
);

CREATE INDEX IF NOT EXISTS subscribers_city_idx ON subscribers(city);

PRAGMA user_version = 1;
";
