//! SQL DDL for the content collections.
//! One table per collection; natural order is `rowid` (insertion) order.

/// SQLite schema with:
/// - `keys`: encrypted secrets, `for_name` UNIQUE
/// - `projects` / `tools`: unique integer ids referenced by `project_tools`;
///   not `INTEGER PRIMARY KEY`, which would alias `rowid` and order by id
/// - `project_tools`: association rows, no uniqueness and no foreign keys
///   (dangling rows are tolerated at read time)
/// - `images` indexed by purpose tag
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS keys (
    for_name TEXT NOT NULL UNIQUE,
    key TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS images (
    href TEXT NOT NULL,
    alt TEXT NOT NULL DEFAULT '',
    for_tag TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_images_for_tag ON images(for_tag);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT '',
    img TEXT NOT NULL DEFAULT '',
    href TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS tools (
    id INTEGER NOT NULL UNIQUE,
    tool TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS project_tools (
    project_id INTEGER NOT NULL,
    tool_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS timeline (
    yearmo TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT ''
);
"#;
