//! SQL schema for the Roam SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- User rows are provisioned by the authentication service sharing this
-- database; this subsystem only reads them.
CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email    TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL    -- hash, opaque to this subsystem
);

-- The unique index on the coordinate pair is the authoritative duplicate
-- guard; application-level pre-checks only refine the error message.
CREATE TABLE IF NOT EXISTS points (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    color       TEXT,
    UNIQUE (latitude, longitude)
);

-- At most one active check-in per (user, point) pair. Deleting a point
-- deletes its ledger rows.
CREATE TABLE IF NOT EXISTS checkins (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(id),
    point_id   INTEGER NOT NULL REFERENCES points(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    UNIQUE (user_id, point_id)
);

CREATE INDEX IF NOT EXISTS points_name_idx    ON points(name);
CREATE INDEX IF NOT EXISTS checkins_point_idx ON checkins(point_id);

PRAGMA user_version = 1;
";
