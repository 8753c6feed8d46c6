//! SQL schema for the mnemo SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Catalog content. Immutable once created.
CREATE TABLE IF NOT EXISTS cards (
    card_id     TEXT PRIMARY KEY,
    prompt      TEXT NOT NULL,
    answer      TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- One scheduling row per (user, card). The only mutable table; every
-- write goes through the version-checked UPDATE in store.rs.
CREATE TABLE IF NOT EXISTS progress (
    user_id         TEXT NOT NULL,
    card_id         TEXT NOT NULL,
    ease_factor     REAL NOT NULL,
    interval_days   INTEGER NOT NULL,
    repetitions     INTEGER NOT NULL,
    last_reviewed   TEXT,            -- NULL until the first review
    next_review     TEXT NOT NULL,
    total_reviews   INTEGER NOT NULL DEFAULT 0,
    correct_reviews INTEGER NOT NULL DEFAULT 0,
    streak          INTEGER NOT NULL DEFAULT 0,
    status          TEXT NOT NULL,   -- 'new' | 'learning' | 'young' | 'mature'
    version         INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, card_id)
);

-- Review events are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS review_events (
    event_id            TEXT PRIMARY KEY,
    user_id             TEXT NOT NULL,
    card_id             TEXT NOT NULL,
    quality             INTEGER NOT NULL,
    time_to_answer_secs INTEGER,
    recorded_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS progress_due_idx      ON progress(user_id, next_review);
CREATE INDEX IF NOT EXISTS review_events_pair_idx ON review_events(user_id, card_id);

PRAGMA user_version = 1;
";
