//! SQL schema for the juris SQLite corpus.
//!
//! Executed once at connection startup. Migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS cases (
    case_id     TEXT PRIMARY KEY,
    court       TEXT NOT NULL,   -- normalised court code, e.g. 'TRE-MG'
    title       TEXT NOT NULL,
    body        TEXT NOT NULL,
    theme       TEXT,
    number      TEXT,
    year        INTEGER,
    embedding   TEXT NOT NULL,   -- JSON array of f32
    ingested_at TEXT NOT NULL    -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS cases_court_idx ON cases(court);
CREATE INDEX IF NOT EXISTS cases_theme_idx ON cases(theme);

PRAGMA user_version = 1;
";
