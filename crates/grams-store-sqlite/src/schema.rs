//! SQL schema for the grams SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    post_id    TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL REFERENCES users(user_id),
    message    TEXT NOT NULL CHECK (trim(message) != ''),
    created_at TEXT NOT NULL,     -- ISO 8601 UTC; server-assigned
    updated_at TEXT NOT NULL
);

-- Removed together with their post; see SqliteStore::delete_post.
CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    post_id    TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    author_id  TEXT NOT NULL REFERENCES users(user_id),
    message    TEXT NOT NULL CHECK (trim(message) != ''),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_created_idx    ON posts(created_at);
CREATE INDEX IF NOT EXISTS comments_post_idx    ON comments(post_id);

PRAGMA user_version = 1;
";
