//! Database schema and migrations for Agora.
//!
//! Migrations are applied sequentially when the database is opened;
//! the schema_version table tracks which have been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table
    r#"
-- Users table for authentication and account management
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,           -- Argon2 hash
    role        TEXT NOT NULL DEFAULT 'member',  -- 'member', 'admin'
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_name ON users(name);
CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: Posts table
    r#"
-- Posts table. The unique index backs the duplicate-submission check:
-- no two posts may share (title, subtitle, author) at the same time.
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    subtitle    TEXT NOT NULL DEFAULT '',
    user_id     INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_posts_user_id ON posts(user_id);
CREATE UNIQUE INDEX idx_posts_submission ON posts(title, subtitle, user_id);
"#,
    // v3: Comments table
    r#"
-- Comments table. Same duplicate-submission rule on (content, commenter, post).
CREATE TABLE comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    content     TEXT NOT NULL,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    post_id     INTEGER NOT NULL REFERENCES posts(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_comments_user_id ON comments(user_id);
CREATE INDEX idx_comments_post_id ON comments(post_id);
CREATE UNIQUE INDEX idx_comments_submission ON comments(content, user_id, post_id);
"#,
];
