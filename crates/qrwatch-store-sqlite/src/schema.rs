//! SQL schema for the qrwatch SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS qr_codes (
    qr_id            TEXT PRIMARY KEY,
    original_url     TEXT NOT NULL,
    description      TEXT NOT NULL,
    address          TEXT NOT NULL,
    last_scanned_url TEXT,
    last_scanned_at  TEXT,            -- ISO 8601 UTC; NULL until first scan
    is_compromised   INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at       TEXT NOT NULL    -- refreshed on every mutation
);

-- Scan history is strictly append-only.
-- No UPDATE is ever issued against this table; rows are removed only when
-- the owning record is deleted.
CREATE TABLE IF NOT EXISTS scans (
    scan_id        TEXT PRIMARY KEY,
    qr_id          TEXT NOT NULL REFERENCES qr_codes(qr_id) ON DELETE CASCADE,
    scanned_at     TEXT NOT NULL,    -- ISO 8601 UTC; store-assigned
    scanned_url    TEXT,             -- NULL for failed fetch attempts
    is_compromised INTEGER,          -- NULL for failed fetch attempts
    error          TEXT              -- NULL for resolved scans
);

CREATE INDEX IF NOT EXISTS qr_codes_created_idx ON qr_codes(created_at);
CREATE INDEX IF NOT EXISTS scans_qr_idx         ON scans(qr_id);
CREATE INDEX IF NOT EXISTS scans_at_idx         ON scans(scanned_at);

PRAGMA user_version = 1;
";
