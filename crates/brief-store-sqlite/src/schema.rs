//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id  TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- created_at is fixed-width RFC 3339 (microseconds, 'Z') so that text
-- ordering matches chronological ordering.
CREATE TABLE IF NOT EXISTS tasks (
    task_id      TEXT PRIMARY KEY,
    account_id   TEXT NOT NULL REFERENCES accounts(account_id),
    subject      TEXT,
    description  TEXT,
    status       TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    event_id     TEXT PRIMARY KEY,
    account_id   TEXT NOT NULL REFERENCES accounts(account_id),
    subject      TEXT,
    description  TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS emails (
    email_id     TEXT PRIMARY KEY,
    account_id   TEXT NOT NULL REFERENCES accounts(account_id),
    subject      TEXT,
    text_body    TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS file_versions (
    file_version_id TEXT PRIMARY KEY,
    document_id     TEXT NOT NULL,
    title           TEXT NOT NULL,
    file_extension  TEXT,
    mime_type       TEXT NOT NULL,
    content         BLOB NOT NULL,
    content_hash    TEXT NOT NULL,   -- SHA-256 hex
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expense_line_items (
    expense_id      TEXT PRIMARY KEY,
    vendor_name     TEXT NOT NULL,
    price_cents     INTEGER NOT NULL CHECK (price_cents >= 0),
    expense_date    TEXT NOT NULL,   -- YYYY-MM-DD
    detail          TEXT NOT NULL,
    account_id      TEXT REFERENCES accounts(account_id),
    file_version_id TEXT REFERENCES file_versions(file_version_id),
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS tasks_account_idx    ON tasks(account_id, created_at);
CREATE INDEX IF NOT EXISTS events_account_idx   ON events(account_id, created_at);
CREATE INDEX IF NOT EXISTS emails_account_idx   ON emails(account_id, created_at);
CREATE INDEX IF NOT EXISTS file_versions_doc_idx ON file_versions(document_id);

PRAGMA user_version = 1;
";
