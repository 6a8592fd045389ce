//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per document. `seq` preserves insertion order across upserts.
CREATE TABLE IF NOT EXISTS documents (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    collection  TEXT NOT NULL,
    doc_id      TEXT NOT NULL,
    fields_json TEXT NOT NULL,   -- JSON object, top-level fields only
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    updated_at  TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    UNIQUE (collection, doc_id)
);

CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents(collection);

PRAGMA user_version = 1;
";
